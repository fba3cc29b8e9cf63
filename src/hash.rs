use sha2::digest::{Reset, Update};

/// Incremental hash accumulator fed with every byte written by a copy.
///
/// Implemented for the `sha2` hashers; callers can plug in anything else
/// (a CRC, a byte counter) by implementing the two methods.
pub trait HashSink {
    fn update(&mut self, bytes: &[u8]);

    /// Discard everything fed so far.
    fn reset(&mut self);
}

macro_rules! impl_digest_sink {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HashSink for $ty {
                fn update(&mut self, bytes: &[u8]) {
                    Update::update(self, bytes);
                }

                fn reset(&mut self) {
                    Reset::reset(self);
                }
            }
        )*
    };
}

impl_digest_sink!(sha2::Sha224, sha2::Sha256, sha2::Sha384, sha2::Sha512);

/// Render a finished digest as lowercase hex.
pub fn to_hex(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
