#![forbid(unsafe_code)]

//! Timing curves for animation phases.

/// Timing curve applied to a phase's linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationCurve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl AnimationCurve {
    /// Map linear progress `t` to eased progress. Both are in `[0.0, 1.0]`;
    /// out-of-range input is clamped.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CURVES: [AnimationCurve; 4] = [
        AnimationCurve::Linear,
        AnimationCurve::EaseIn,
        AnimationCurve::EaseOut,
        AnimationCurve::EaseInOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for curve in CURVES {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?}");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6, "{curve:?}");
        }
    }

    #[test]
    fn ease_in_starts_slow_ease_out_starts_fast() {
        assert!(AnimationCurve::EaseIn.apply(0.25) < 0.25);
        assert!(AnimationCurve::EaseOut.apply(0.25) > 0.25);
        assert!((AnimationCurve::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(AnimationCurve::Linear.apply(-1.0), 0.0);
        assert_eq!(AnimationCurve::Linear.apply(9.0), 1.0);
        assert_eq!(AnimationCurve::EaseOut.apply(f32::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn curves_are_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for curve in CURVES {
                prop_assert!(curve.apply(lo) <= curve.apply(hi) + 1e-6);
            }
        }
    }
}
