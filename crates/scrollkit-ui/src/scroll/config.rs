//! L4 Atomic Layer: Configuration types for smooth scrolling
//!
//! Re-exports configuration from scrollkit-core and adds the momentum math
//! that depends only on the tuning values.

// Re-export config types from core
pub use scrollkit_core::{ScrollConfig, ScrollbarConfig};

use super::timing::approach;

/// Extension trait for ScrollConfig with momentum helpers
pub trait ScrollConfigExt {
    /// Velocity change produced by one wheel event
    ///
    /// Positive wheel deltas (wheel up) scroll toward the start.
    fn wheel_impulse(&self, delta: f64) -> f64;

    /// Decay residual momentum over one frame of `dt` seconds
    fn decay_velocity(&self, velocity: f64, dt: f64) -> f64;

    /// Whether momentum is too small to keep moving
    fn is_settled(&self, velocity: f64) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn wheel_impulse(&self, delta: f64) -> f64 {
        -delta * self.wheel_force
    }

    #[inline]
    fn decay_velocity(&self, velocity: f64, dt: f64) -> f64 {
        approach(velocity, 0.0, self.smooth_speed, dt)
    }

    #[inline]
    fn is_settled(&self, velocity: f64) -> bool {
        velocity.abs() < self.velocity_threshold
    }
}
