//! L2 Organism Layer: Scroll driver state machine
//!
//! One driver per scrollable axis owns the authoritative scroll value and
//! arbitrates between three motion sources: click/programmatic animation,
//! drag, and wheel momentum. At most one of them writes the value per
//! frame, in that priority order.

use tracing::{debug, trace};

use super::animation::{AnimationRequest, ClickAnimation, CompletionCallback, PendingAnimation};
use super::config::{ScrollConfig, ScrollConfigExt};
use super::guard::FiniteGuard;
use super::timing::clamp_scroll;
use crate::event::{ScrollEmitter, SubscriptionId};

/// Scroll axis a driver moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

/// Which motion source currently owns the scroll value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    #[default]
    Idle,
    WheelMomentum,
    ClickAnimating,
    Dragging,
}

/// Drag gesture anchor
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer_start: f64,
    scroll_start: f64,
    /// Scroll units per pointer unit (negative for content panning)
    ratio: f64,
    pointer_now: f64,
}

#[derive(Debug)]
pub struct ScrollDriver {
    axis: Axis,
    config: ScrollConfig,
    scroll: f64,
    /// Scrollable distance; 0 while disabled, at least 1 otherwise
    canvas_size: f64,
    viewport_extent: f64,
    content_extent: f64,
    enabled: bool,
    smooth_velocity: f64,
    mode: ScrollMode,
    animation: Option<ClickAnimation>,
    pending: Option<PendingAnimation>,
    drag: Option<DragAnchor>,
    /// Seconds accumulated through `advance`
    clock: f64,
    guard: FiniteGuard,
    emitter: ScrollEmitter,
}

impl ScrollDriver {
    /// Create a driver for `axis`. It stays disabled until the first `configure`.
    pub fn new(axis: Axis, config: ScrollConfig) -> Self {
        Self {
            axis,
            config,
            scroll: 0.0,
            canvas_size: 0.0,
            viewport_extent: 0.0,
            content_extent: 0.0,
            enabled: false,
            smooth_velocity: 0.0,
            mode: ScrollMode::Idle,
            animation: None,
            pending: None,
            drag: None,
            clock: 0.0,
            guard: FiniteGuard::new(),
            emitter: ScrollEmitter::new(),
        }
    }

    /// Vertical driver with default tuning
    pub fn vertical() -> Self {
        Self::new(Axis::Vertical, ScrollConfig::vertical())
    }

    /// Horizontal driver with default tuning
    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal, ScrollConfig::horizontal())
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Register for offset changes (`offset = -scroll`)
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(f64) + 'static,
    {
        self.emitter.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.emitter.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// Current scroll position, live even while an animation is in flight
    #[inline]
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Content offset: content moves opposite to scroll growth
    #[inline]
    pub fn offset(&self) -> f64 {
        if self.scroll == 0.0 {
            0.0
        } else {
            -self.scroll
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Scrollable distance, 0 when the content fits the viewport
    #[inline]
    pub fn canvas_size(&self) -> f64 {
        self.canvas_size
    }

    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Fraction of the content visible in the viewport
    pub fn bar_scale(&self) -> f64 {
        let total = self.canvas_size + self.viewport_extent;
        if total <= 0.0 {
            1.0
        } else {
            (self.viewport_extent / total).clamp(0.0, 1.0)
        }
    }

    #[inline]
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    #[inline]
    pub fn smooth_velocity(&self) -> f64 {
        self.smooth_velocity
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn has_pending_animation(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Driver-local time in seconds
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Where the scroll value is headed once current motion settles
    pub fn target_scroll(&self) -> f64 {
        if let Some(anim) = &self.animation {
            anim.target_value
        } else if let Some(pending) = &self.pending {
            clamp_scroll(pending.target, self.canvas_size)
        } else {
            self.scroll
        }
    }

    /// Whether `advance` still has work to do
    /// Use this to determine if the host needs to keep ticking at full rate
    pub fn needs_update(&self) -> bool {
        self.mode != ScrollMode::Idle || self.smooth_velocity != 0.0 || self.pending.is_some()
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Recompute the scrollable distance from the viewport and content extents
    ///
    /// Content that fits the viewport disables the driver and pins scroll at 0.
    pub fn configure(&mut self, viewport_extent: f64, content_extent: f64) {
        if !self
            .guard
            .check("configure", &[viewport_extent, content_extent])
        {
            return;
        }
        self.viewport_extent = viewport_extent.max(0.0);
        self.content_extent = content_extent.max(0.0);

        let overflow = self.content_extent - self.viewport_extent;
        if overflow <= 0.0 {
            if self.enabled {
                debug!(axis = ?self.axis, "Content fits viewport, scrolling disabled");
            }
            self.enabled = false;
            self.canvas_size = 0.0;
            self.stop_motion();
            self.update_scroll(0.0);
            return;
        }

        if !self.enabled {
            debug!(axis = ?self.axis, canvas_size = overflow.max(1.0), "Scrolling enabled");
        }
        self.enabled = true;
        self.canvas_size = overflow.max(1.0);
        let clamped = clamp_scroll(self.scroll, self.canvas_size);
        self.update_scroll(clamped);
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Jump to `value` immediately, cancelling every motion source
    pub fn set_scroll(&mut self, value: f64) {
        if !self.guard.check("set_scroll", &[value]) {
            return;
        }
        if !self.enabled {
            trace!(axis = ?self.axis, value, "set_scroll ignored, driver disabled");
            return;
        }
        self.stop_motion();
        self.commit_scroll(clamp_scroll(value, self.canvas_size));
    }

    /// Tween to `target` over `duration` seconds
    pub fn animate_to(&mut self, target: f64, duration: f64) {
        self.animate(AnimationRequest::new(target, duration));
    }

    /// Start (or schedule, when delayed) a click/programmatic animation
    ///
    /// A new request discards the callback of any animation it replaces.
    pub fn animate(&mut self, request: AnimationRequest) {
        let AnimationRequest {
            target,
            duration,
            delay,
            on_complete,
        } = request;
        if !self.guard.check("animate_to", &[target, duration, delay]) {
            return;
        }
        if !self.enabled {
            trace!(axis = ?self.axis, target, "animate_to ignored, driver disabled");
            return;
        }
        let duration = duration.max(0.0);
        let delay = delay.max(0.0);

        if delay > 0.0 {
            if self.pending.is_some() {
                trace!(axis = ?self.axis, "Replacing pending animation");
            }
            self.pending = Some(PendingAnimation {
                fire_at: self.clock + delay,
                target,
                duration,
                on_complete,
            });
            return;
        }

        self.pending = None;
        self.start_animation(target, duration, self.clock, on_complete);
    }

    /// Feed mouse-wheel notches into the momentum integrator
    ///
    /// While dragging or animating the impulse is only recorded; it moves the
    /// scroll value once the driver is free again.
    pub fn wheel(&mut self, delta: f64) {
        if !self.guard.check("wheel", &[delta]) {
            return;
        }
        if !self.enabled {
            return;
        }
        let limit = self.canvas_size;
        self.smooth_velocity =
            (self.smooth_velocity + self.config.wheel_impulse(delta)).clamp(-limit, limit);
        if self.mode == ScrollMode::Idle && self.smooth_velocity != 0.0 {
            self.set_mode(ScrollMode::WheelMomentum);
        }
    }

    /// Begin a 1:1 drag at `pointer`
    pub fn begin_drag(&mut self, pointer: f64) -> bool {
        self.begin_drag_with_ratio(pointer, 1.0)
    }

    /// Begin a drag where each pointer unit moves scroll by `ratio`
    ///
    /// Returns false when the gesture was not dispatched (disabled driver or
    /// non-finite input).
    pub fn begin_drag_with_ratio(&mut self, pointer: f64, ratio: f64) -> bool {
        if !self.guard.check("begin_drag", &[pointer, ratio]) {
            return false;
        }
        if !self.enabled {
            trace!(axis = ?self.axis, "Drag ignored, driver disabled");
            return false;
        }
        self.cancel_animation();
        self.pending = None;
        self.smooth_velocity = 0.0;
        self.drag = Some(DragAnchor {
            pointer_start: pointer,
            scroll_start: self.scroll,
            ratio,
            pointer_now: pointer,
        });
        self.set_mode(ScrollMode::Dragging);
        true
    }

    /// Record the pointer position of an active drag; applied on the next tick
    pub fn drag_to(&mut self, pointer: f64) {
        if !self.guard.check("drag_to", &[pointer]) {
            return;
        }
        if let Some(drag) = self.drag.as_mut() {
            drag.pointer_now = pointer;
        }
    }

    /// Release the drag; the last recorded pointer position is applied first
    pub fn end_drag(&mut self) {
        if self.drag.is_none() {
            return;
        }
        self.step_drag();
        self.drag = None;
        self.set_mode(ScrollMode::Idle);
    }

    /// Stop all motion where it is
    pub fn cancel(&mut self) {
        self.stop_motion();
    }

    // ------------------------------------------------------------------
    // Per-frame update
    // ------------------------------------------------------------------

    /// Advance the state machine by `dt` seconds
    ///
    /// Returns the new offset when the scroll value changed this frame.
    pub fn advance(&mut self, dt: f64) -> Option<f64> {
        if !self.guard.check("advance", &[dt]) {
            return None;
        }
        let dt = dt.max(0.0);
        self.clock += dt;
        let before = self.scroll;

        if self.start_due_animation() {
            // A zero-duration delayed animation already landed this frame
            return (self.scroll != before).then(|| self.offset());
        }

        match self.mode {
            ScrollMode::ClickAnimating => self.step_animation(),
            ScrollMode::Dragging => self.step_drag(),
            _ if self.smooth_velocity != 0.0 => self.step_momentum(dt),
            ScrollMode::WheelMomentum => self.set_mode(ScrollMode::Idle),
            ScrollMode::Idle => {}
        }

        (self.scroll != before).then(|| self.offset())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Promote a due pending animation. Returns true if it completed instantly.
    fn start_due_animation(&mut self) -> bool {
        let due = matches!(&self.pending, Some(p) if self.clock >= p.fire_at);
        if !due {
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        self.start_animation(
            pending.target,
            pending.duration,
            pending.fire_at,
            pending.on_complete,
        );
        self.mode != ScrollMode::ClickAnimating
    }

    fn start_animation(
        &mut self,
        target: f64,
        duration: f64,
        start_time: f64,
        on_complete: Option<CompletionCallback>,
    ) {
        let target = clamp_scroll(target, self.canvas_size);
        self.cancel_animation();
        self.drag = None;
        self.smooth_velocity = 0.0;

        if duration <= 0.0 {
            self.set_mode(ScrollMode::Idle);
            self.commit_scroll(target);
            if let Some(callback) = on_complete {
                callback();
            }
            return;
        }

        self.animation = Some(ClickAnimation {
            start_value: self.scroll,
            target_value: target,
            start_time,
            duration,
            easing: self.config.easing,
            on_complete,
        });
        self.set_mode(ScrollMode::ClickAnimating);
    }

    fn step_animation(&mut self) {
        let Some(anim) = self.animation.as_ref() else {
            self.set_mode(ScrollMode::Idle);
            return;
        };
        let (value, done) = anim.sample(self.clock);
        self.update_scroll(clamp_scroll(value, self.canvas_size));

        if done {
            let finished = self.animation.take();
            self.set_mode(ScrollMode::Idle);
            if let Some(callback) = finished.and_then(|a| a.on_complete) {
                callback();
            }
        }
    }

    fn step_drag(&mut self) {
        let Some(drag) = self.drag else {
            return;
        };
        let value = drag.scroll_start + (drag.pointer_now - drag.pointer_start) * drag.ratio;
        self.update_scroll(clamp_scroll(value, self.canvas_size));
    }

    fn step_momentum(&mut self, dt: f64) {
        let velocity = self.config.decay_velocity(self.smooth_velocity, dt);
        if self.config.is_settled(velocity) {
            self.smooth_velocity = 0.0;
            self.set_mode(ScrollMode::Idle);
            return;
        }
        if self.mode != ScrollMode::WheelMomentum {
            self.set_mode(ScrollMode::WheelMomentum);
        }

        let next = clamp_scroll(self.scroll + velocity, self.canvas_size);
        let hit_bound =
            (velocity > 0.0 && next >= self.canvas_size) || (velocity < 0.0 && next <= 0.0);
        self.smooth_velocity = if hit_bound { 0.0 } else { velocity };
        self.update_scroll(next);
        if hit_bound {
            self.set_mode(ScrollMode::Idle);
        }
    }

    /// Drop the running animation without invoking its callback
    fn cancel_animation(&mut self) {
        if let Some(anim) = self.animation.take() {
            debug!(
                axis = ?self.axis,
                target = anim.target_value,
                "Click animation cancelled"
            );
        }
    }

    fn stop_motion(&mut self) {
        self.cancel_animation();
        self.pending = None;
        self.drag = None;
        self.smooth_velocity = 0.0;
        self.set_mode(ScrollMode::Idle);
    }

    fn set_mode(&mut self, mode: ScrollMode) {
        if self.mode != mode {
            debug!(axis = ?self.axis, from = ?self.mode, to = ?mode, scroll = self.scroll, "Scroll mode transition");
            self.mode = mode;
        }
    }

    /// Write a new value and notify listeners only if it changed
    fn update_scroll(&mut self, value: f64) {
        if value != self.scroll {
            self.commit_scroll(value);
        }
    }

    /// Write a new value and always notify listeners
    fn commit_scroll(&mut self, value: f64) {
        self.scroll = value;
        let offset = self.offset();
        self.emitter.emit(offset);
    }
}
