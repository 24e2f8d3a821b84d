//! L4 Atomic Layer: easing curves for click and programmatic scroll tweens

pub use scrollkit_core::EasingType;

use super::timing::lerp;

/// Curve evaluation for [`EasingType`]
pub trait EasingTypeExt {
    /// Eased progress for `t`, clamped to [0, 1] on both sides
    fn apply(&self, t: f64) -> f64;

    /// Value between `from` and `to` at eased progress `t`
    fn interpolate(&self, from: f64, to: f64, t: f64) -> f64 {
        lerp(from, to, self.apply(t))
    }
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let remaining = 1.0 - t;
        match self {
            // Holds the start value for the whole duration, then lands
            EasingType::None => f64::from(u8::from(t >= 1.0)),
            EasingType::Linear => t,
            EasingType::Cubic => 1.0 - remaining.powi(3),
            EasingType::Quintic => 1.0 - remaining.powi(5),
            EasingType::EaseOut if t >= 1.0 => 1.0,
            EasingType::EaseOut => 1.0 - (-10.0 * t).exp2(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [EasingType; 5] = [
        EasingType::None,
        EasingType::Linear,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
    ];

    #[test]
    fn test_curves_pin_endpoints() {
        for easing in CURVES {
            assert_eq!(easing.apply(0.0), 0.0, "{:?} at start", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?} at end", easing);
        }
    }

    #[test]
    fn test_curves_never_reverse() {
        for easing in CURVES {
            let samples: Vec<f64> = (0..=20).map(|i| easing.apply(i as f64 / 20.0)).collect();
            assert!(
                samples.windows(2).all(|w| w[1] >= w[0]),
                "{:?} reverses: {:?}",
                easing,
                samples
            );
        }
    }

    #[test]
    fn test_progress_outside_unit_range() {
        assert_eq!(EasingType::Linear.apply(-3.0), 0.0);
        assert_eq!(EasingType::Cubic.apply(7.5), 1.0);
        assert_eq!(EasingType::None.apply(0.99), 0.0);
    }

    #[test]
    fn test_decelerating_curves_lead_linear() {
        let linear = EasingType::Linear.apply(0.5);
        for easing in [EasingType::Cubic, EasingType::Quintic, EasingType::EaseOut] {
            assert!(easing.apply(0.5) > linear, "{:?}", easing);
        }
    }

    #[test]
    fn test_interpolate_between_scroll_values() {
        assert_eq!(EasingType::Linear.interpolate(100.0, 300.0, 0.25), 150.0);
        assert_eq!(EasingType::Cubic.interpolate(300.0, 100.0, 1.0), 100.0);
    }
}
