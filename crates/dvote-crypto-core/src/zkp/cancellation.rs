//! Cooperative cancellation for proof generation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::CryptoError;

/// Caller-owned cancellation boundary: a shared flag, an optional deadline,
/// or both.
///
/// Clones share the flag, so the caller keeps one handle and passes another
/// into [`generate_zk_proof`](super::generate_zk_proof). The prover checks it
/// between phases and once per tree level while building constraints.
#[derive(Debug, Clone, Default)]
pub struct ProofCancellation {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl ProofCancellation {
    /// Never cancels unless [`cancel`](Self::cancel) is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels once `timeout` has elapsed from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// # Errors
    ///
    /// Returns `CryptoError::Cancelled` once the flag is set or the deadline passed.
    pub fn check(&self) -> Result<(), CryptoError> {
        if self.is_cancelled() {
            return Err(CryptoError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_handle_is_live() {
        assert!(ProofCancellation::new().check().is_ok());
    }

    #[test]
    fn clones_share_the_flag() {
        let a = ProofCancellation::new();
        let b = a.clone();
        b.cancel();
        assert!(a.is_cancelled());
        assert!(matches!(a.check(), Err(CryptoError::Cancelled)));
    }

    #[test]
    fn past_deadline_cancels() {
        let c = ProofCancellation::with_deadline(Instant::now());
        assert!(c.is_cancelled());
    }

    #[test]
    fn generous_timeout_does_not_cancel() {
        let c = ProofCancellation::with_timeout(Duration::from_secs(3600));
        assert!(!c.is_cancelled());
    }
}
