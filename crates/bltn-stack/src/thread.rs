#![forbid(unsafe_code)]

//! UI-thread affinity.

use std::thread::{self, ThreadId};

use crate::error::ContractViolation;

/// The thread a manager was created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiThread {
    id: ThreadId,
}

impl UiThread {
    /// Capture the calling thread.
    pub fn current() -> Self {
        Self {
            id: thread::current().id(),
        }
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Panic with [`ContractViolation::OffUiThread`] unless called on this thread.
    #[track_caller]
    pub fn assert_current(&self, operation: &'static str) {
        if !self.is_current() {
            ContractViolation::OffUiThread { operation }.raise();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_thread_passes() {
        let ui = UiThread::current();
        assert!(ui.is_current());
        ui.assert_current("push");
    }

    #[test]
    fn other_thread_fails() {
        let ui = UiThread::current();
        let result = thread::spawn(move || {
            std::panic::catch_unwind(|| ui.assert_current("push")).is_err()
        })
        .join()
        .unwrap();
        assert!(result);
        assert!(!thread::spawn(move || ui.is_current()).join().unwrap());
    }
}
