//! L3 Molecular Layer: Click/programmatic scroll animations
//!
//! Combines easing and timing into the tween records the driver steps each
//! frame. Completion callbacks live here and are dropped, never invoked, when
//! an animation is superseded.

use std::fmt;

use super::easing::{EasingType, EasingTypeExt};
use super::timing::progress;

/// Invoked once when an animation reaches its target
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Parameters for [`ScrollDriver::animate`](super::ScrollDriver::animate)
pub struct AnimationRequest {
    pub(crate) target: f64,
    pub(crate) duration: f64,
    pub(crate) delay: f64,
    pub(crate) on_complete: Option<CompletionCallback>,
}

impl AnimationRequest {
    /// Animate to `target` over `duration` seconds, starting immediately
    pub fn new(target: f64, duration: f64) -> Self {
        Self {
            target,
            duration,
            delay: 0.0,
            on_complete: None,
        }
    }

    /// Wait `delay` seconds before the animation takes over
    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Run `callback` once the target is reached
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for AnimationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRequest")
            .field("target", &self.target)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// Active click animation state
pub(crate) struct ClickAnimation {
    /// Scroll position when the animation took over
    pub start_value: f64,
    /// Clamped target position
    pub target_value: f64,
    /// Driver clock time the animation started
    pub start_time: f64,
    pub duration: f64,
    pub easing: EasingType,
    pub on_complete: Option<CompletionCallback>,
}

impl ClickAnimation {
    /// Position at driver time `now`, and whether the animation is finished
    pub fn sample(&self, now: f64) -> (f64, bool) {
        let t = progress(now - self.start_time, self.duration);
        if t >= 1.0 {
            // Land on the target exactly rather than on a rounded lerp
            (self.target_value, true)
        } else {
            (
                self.easing
                    .interpolate(self.start_value, self.target_value, t),
                false,
            )
        }
    }
}

impl fmt::Debug for ClickAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickAnimation")
            .field("start_value", &self.start_value)
            .field("target_value", &self.target_value)
            .field("start_time", &self.start_time)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// Delayed animation waiting for its start time
pub(crate) struct PendingAnimation {
    /// Driver clock time at which the animation takes over
    pub fire_at: f64,
    pub target: f64,
    pub duration: f64,
    pub on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for PendingAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAnimation")
            .field("fire_at", &self.fire_at)
            .field("target", &self.target)
            .field("duration", &self.duration)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}
