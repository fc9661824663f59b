//! Easing curves
//!
//! Every curve maps normalized progress `t ∈ [0, 1]` to eased progress with
//! `f(0) = 0` and `f(1) = 1`. Input outside the range is clamped first.

use serde::{Deserialize, Serialize};

/// An easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^3`
    EaseOutCubic,
    /// `1 - (1 - t)^5`, fast start with a long soft landing
    #[default]
    EaseOutQuint,
    EaseInOutCubic,
}

impl Easing {
    /// Apply the curve to normalized progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseOutCubic,
        Easing::EaseOutQuint,
        Easing::EaseInOutCubic,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_clamps_out_of_range() {
        for easing in ALL {
            assert_eq!(easing.apply(-0.5), 0.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
    }

    #[test]
    fn test_ease_out_quint_values() {
        // 1 - 0.5^5 = 0.96875
        assert!((Easing::EaseOutQuint.apply(0.5) - 0.96875).abs() < 1e-6);
        // Ease-out curves run ahead of linear
        assert!(Easing::EaseOutQuint.apply(0.2) > 0.2);
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev, "{:?} not monotonic at {}", easing, i);
                prev = v;
            }
        }
    }
}
