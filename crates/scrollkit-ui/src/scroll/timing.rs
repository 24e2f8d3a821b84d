//! L4 Atomic Layer: Time calculation utilities for scroll animations
//!
//! All times are seconds on the driver's own frame clock, so the functions
//! here stay pure and deterministic.

/// Fraction of `duration` covered after `elapsed` seconds, clamped to [0, 1]
///
/// A non-positive duration counts as already finished.
#[inline]
pub fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Move `current` toward `target` by a frame-rate scaled fraction
///
/// `rate * dt` is capped at 1 so a long frame lands on the target instead of
/// overshooting it.
#[inline]
pub fn approach(current: f64, target: f64, rate: f64, dt: f64) -> f64 {
    lerp(current, target, (rate * dt).clamp(0.0, 1.0))
}

/// Clamp a scroll value into `[0, max]`
#[inline]
pub fn clamp_scroll(value: f64, max: f64) -> f64 {
    value.clamp(0.0, max.max(0.0))
}
