//! Request-in-flight flag.
//!
//! The flag stores the ticket of the outstanding upload (0 when idle). A guard
//! travels with the upload and lowers the flag when dropped, but only if the
//! flag still names its own ticket: a reset may already have released it and
//! a newer upload may have raised it again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chromapick_types::UploadTicket;

const IDLE: u64 = 0;

#[derive(Debug, Clone, Default)]
pub struct InFlightFlag(Arc<AtomicU64>);

impl InFlightFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire) != IDLE
    }

    /// Raise the flag for `ticket`. Returns `None` if another upload holds it.
    pub(crate) fn acquire(&self, ticket: UploadTicket) -> Option<InFlightGuard> {
        debug_assert_ne!(ticket.0, IDLE);
        self.0
            .compare_exchange(IDLE, ticket.0, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: Arc::clone(&self.0),
                ticket,
            })
    }

    /// Lower the flag regardless of which upload holds it.
    pub(crate) fn release(&self) {
        self.0.store(IDLE, Ordering::Release);
    }
}

/// Lowers the owning [`InFlightFlag`] on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    flag: Arc<AtomicU64>,
    ticket: UploadTicket,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let _ = self
            .flag
            .compare_exchange(self.ticket.0, IDLE, Ordering::AcqRel, Ordering::Acquire);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_lowers_flag_on_drop() {
        let flag = InFlightFlag::default();
        let guard = flag.acquire(UploadTicket(1)).expect("idle flag");
        assert!(flag.is_set());
        assert!(flag.acquire(UploadTicket(2)).is_none());
        drop(guard);
        assert!(!flag.is_set());
    }

    #[test]
    fn stale_guard_does_not_lower_newer_upload() {
        let flag = InFlightFlag::default();
        let stale = flag.acquire(UploadTicket(1)).expect("idle flag");
        flag.release();
        let current = flag.acquire(UploadTicket(2)).expect("released flag");
        drop(stale);
        assert!(flag.is_set());
        drop(current);
        assert!(!flag.is_set());
    }
}
