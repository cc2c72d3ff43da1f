#![forbid(unsafe_code)]

//! Integration contract violations.
//!
//! The manager has no recoverable errors: every failure is a caller breaking
//! the usage contract (wrong thread, wrong lifecycle state, missing link).
//! Public operations log the violation and panic with its message.

use std::fmt;

/// A broken usage contract. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// Called from a thread other than the one that created the manager.
    OffUiThread { operation: &'static str },
    /// Called before `prepare()` or after `dismiss_bulletin()`.
    NotPrepared { operation: &'static str },
    /// `prepare()` called while already prepared.
    AlreadyPrepared,
    /// `prepare()` called while a dismissal is still completing.
    DismissalPending,
    /// `display_next_item()` with no `next` link on the current item.
    MissingNextItem { current: String },
    /// No presentation surface exists.
    NoSurface { operation: &'static str },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffUiThread { operation } => {
                write!(f, "`{operation}` must be called on the UI thread")
            }
            Self::NotPrepared { operation } => write!(
                f,
                "`{operation}` requires a prepared manager; call `prepare()` first"
            ),
            Self::AlreadyPrepared => write!(f, "the manager is already prepared"),
            Self::DismissalPending => write!(
                f,
                "cannot prepare while the previous dismissal is still completing"
            ),
            Self::MissingNextItem { current } => write!(
                f,
                "item `{current}` has no next item to display"
            ),
            Self::NoSurface { operation } => {
                write!(f, "`{operation}` needs a presentation surface, but none is loaded")
            }
        }
    }
}

impl std::error::Error for ContractViolation {}

impl ContractViolation {
    /// Log and panic. Contract violations are integration bugs.
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        tracing::error!(violation = %self, "bulletin contract violated");
        panic!("{self}");
    }
}
