use std::io::{self, Read, Write};
use std::path::Path;

use indicatif::ProgressBar;

use crate::cancel::CancelToken;
use crate::error::{CpError, CpResult};
use crate::hash::HashSink;
use crate::options::DEFAULT_BUFFER_SIZE;

/// Stream `reader` into `writer` through one reusable buffer of
/// `buf_size` bytes, returning the number of bytes copied.
///
/// The token is polled before every read and every write. Each chunk is
/// written verbatim and then fed to `hash`, so the digest covers exactly
/// the bytes that reached the destination. Short reads just loop; a read
/// of zero bytes ends the stream.
///
/// Cleaning up a partially written destination is the caller's job.
#[allow(clippy::too_many_arguments)]
pub fn stream_copy<R, W>(
    cancel: &CancelToken,
    reader: &mut R,
    writer: &mut W,
    buf_size: usize,
    mut hash: Option<&mut (dyn HashSink + '_)>,
    src_path: &Path,
    dst_path: &Path,
    pb: &ProgressBar,
) -> CpResult<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let size = if buf_size == 0 { DEFAULT_BUFFER_SIZE } else { buf_size };
    let mut buf = vec![0u8; size];
    let mut copied: u64 = 0;

    loop {
        cancel.check()?;

        let n = match reader.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CpError::Read {
                    path: src_path.to_path_buf(),
                    source: e,
                });
            }
        };
        if n == 0 {
            break;
        }

        cancel.check()?;

        writer.write_all(&buf[..n]).map_err(|e| CpError::Write {
            path: dst_path.to_path_buf(),
            source: e,
        })?;
        if let Some(h) = hash.as_deref_mut() {
            h.update(&buf[..n]);
        }

        copied += n as u64;
        pb.inc(n as u64);
    }

    writer.flush().map_err(|e| CpError::Write {
        path: dst_path.to_path_buf(),
        source: e,
    })?;

    Ok(copied)
}
