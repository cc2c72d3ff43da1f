#![forbid(unsafe_code)]

//! Phased animation for bltn transitions.
//!
//! - [`AnimationPhase`]: a block plus completion handler occupying a fraction
//!   of a chain's duration.
//! - [`AnimationChain`]: phases that run strictly one after another.
//! - [`AnimationScheduler`]: a cooperative queue that runs chains in FIFO order
//!   as the host advances time.
//!
//! Everything here is single-threaded (`Rc`-based) and meant to be driven
//! from the UI thread.

pub mod chain;
pub mod curve;
pub mod scheduler;

pub use chain::{AnimationChain, AnimationPhase};
pub use curve::AnimationCurve;
pub use scheduler::{AnimationScheduler, ChainId, PhaseProgress};
