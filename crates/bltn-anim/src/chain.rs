#![forbid(unsafe_code)]

//! Animation phases and the chains that order them.
//!
//! A chain has one total duration; each phase takes a fraction of it
//! (`relative_duration`) after an optional fractional delay. A phase's block
//! sets the target state when the phase begins and its completion handler
//! runs once the phase's time has elapsed.
//!
//! Chains are consumed by [`AnimationChain::start`], so a running chain can
//! no longer gain phases.

use std::fmt;
use std::time::Duration;

use crate::curve::AnimationCurve;
use crate::scheduler::{AnimationScheduler, ChainId};

pub(crate) type Callback = Box<dyn FnOnce()>;

/// One step of an [`AnimationChain`].
pub struct AnimationPhase {
    relative_duration: f32,
    relative_delay: f32,
    curve: AnimationCurve,
    pub(crate) block: Option<Callback>,
    pub(crate) completion: Option<Callback>,
}

fn sanitize_fraction(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl AnimationPhase {
    /// Create a phase taking `relative_duration` of the chain's duration.
    ///
    /// Negative or non-finite fractions are treated as zero.
    pub fn new(relative_duration: f32, curve: AnimationCurve) -> Self {
        Self {
            relative_duration: sanitize_fraction(relative_duration),
            relative_delay: 0.0,
            curve,
            block: None,
            completion: None,
        }
    }

    /// Delay before the phase begins, as a fraction of the chain duration.
    pub fn relative_delay(mut self, relative_delay: f32) -> Self {
        self.relative_delay = sanitize_fraction(relative_delay);
        self
    }

    /// Set the block run when the phase begins.
    pub fn block(mut self, block: impl FnOnce() + 'static) -> Self {
        self.block = Some(Box::new(block));
        self
    }

    /// Set the handler run once the phase has finished.
    pub fn on_complete(mut self, completion: impl FnOnce() + 'static) -> Self {
        self.completion = Some(Box::new(completion));
        self
    }

    pub fn relative_duration_fraction(&self) -> f32 {
        self.relative_duration
    }

    pub fn relative_delay_fraction(&self) -> f32 {
        self.relative_delay
    }

    pub fn curve(&self) -> AnimationCurve {
        self.curve
    }

    pub(crate) fn delay_in(&self, total: Duration) -> Duration {
        total.mul_f64(f64::from(self.relative_delay))
    }

    pub(crate) fn length_in(&self, total: Duration) -> Duration {
        total.mul_f64(f64::from(self.relative_duration))
    }
}

impl fmt::Debug for AnimationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationPhase")
            .field("relative_duration", &self.relative_duration)
            .field("relative_delay", &self.relative_delay)
            .field("curve", &self.curve)
            .field("has_block", &self.block.is_some())
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}

/// Ordered list of phases sharing one total duration.
pub struct AnimationChain {
    duration: Duration,
    pub(crate) phases: Vec<AnimationPhase>,
    pub(crate) on_finish: Option<Callback>,
}

impl AnimationChain {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            phases: Vec::new(),
            on_finish: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Append a phase; phases run in insertion order.
    pub fn add(&mut self, phase: AnimationPhase) -> &mut Self {
        self.phases.push(phase);
        self
    }

    /// Builder form of [`add`](Self::add).
    pub fn with_phase(mut self, phase: AnimationPhase) -> Self {
        self.phases.push(phase);
        self
    }

    /// Handler run after the last phase's completion handler.
    pub fn on_finish(&mut self, handler: impl FnOnce() + 'static) -> &mut Self {
        self.on_finish = Some(Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Sum of the phases' delays and durations, as a fraction of the chain.
    pub fn total_relative_duration(&self) -> f32 {
        self.phases
            .iter()
            .map(|p| p.relative_delay + p.relative_duration)
            .sum()
    }

    /// Hand the chain to `scheduler`. Everything already due (the whole chain
    /// when its duration is zero) runs before this returns.
    pub fn start(self, scheduler: &AnimationScheduler) -> ChainId {
        scheduler.start(self)
    }
}

impl fmt::Debug for AnimationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationChain")
            .field("duration", &self.duration)
            .field("phases", &self.phases)
            .field("has_on_finish", &self.on_finish.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_are_sanitized() {
        let p = AnimationPhase::new(-1.0, AnimationCurve::Linear).relative_delay(f32::NAN);
        assert_eq!(p.relative_duration_fraction(), 0.0);
        assert_eq!(p.relative_delay_fraction(), 0.0);
    }

    #[test]
    fn phase_times_scale_with_chain() {
        let total = Duration::from_millis(900);
        let p = AnimationPhase::new(1.0 / 3.0, AnimationCurve::Linear).relative_delay(0.5);
        let length = p.length_in(total).as_millis();
        assert!((299..=300).contains(&length), "length {length}");
        assert_eq!(p.delay_in(total), Duration::from_millis(450));
    }

    #[test]
    fn chain_tracks_phases() {
        let mut chain = AnimationChain::new(Duration::from_millis(750));
        assert!(chain.is_empty());
        chain
            .add(AnimationPhase::new(1.0 / 3.0, AnimationCurve::Linear))
            .add(AnimationPhase::new(1.0 / 3.0, AnimationCurve::Linear));
        let chain = chain.with_phase(AnimationPhase::new(1.0 / 3.0, AnimationCurve::Linear));
        assert_eq!(chain.len(), 3);
        assert!((chain.total_relative_duration() - 1.0).abs() < 1e-6);
        assert_eq!(chain.duration(), Duration::from_millis(750));
    }

    #[test]
    fn debug_reports_callbacks() {
        let p = AnimationPhase::new(1.0, AnimationCurve::EaseIn).block(|| {});
        let dbg = format!("{p:?}");
        assert!(dbg.contains("has_block: true"));
        assert!(dbg.contains("has_completion: false"));
    }
}
