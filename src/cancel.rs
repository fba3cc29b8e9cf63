use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{CpError, CpResult};

/// Cooperative cancellation signal shared by every layer of a copy.
///
/// Clones share the same flag, so one clone can be handed to another thread
/// (or a signal handler) and canceled there. The copy only polls the token:
/// once per visited entry and before every buffer read and write. A syscall
/// already in flight always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also reports cancellation once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(d) => Instant::now() >= d,
            None => false,
        }
    }

    /// Poll point: `Err(CpError::Canceled)` once the token fired.
    #[inline]
    pub fn check(&self) -> CpResult<()> {
        if self.is_canceled() {
            Err(CpError::Canceled)
        } else {
            Ok(())
        }
    }
}
