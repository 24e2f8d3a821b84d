use tracing::trace;

use crate::scroll::timing::{approach, lerp};
use crate::scroll::{FiniteGuard, ScrollDriver, ScrollbarConfig};

/// Presentation of a scroll driver as a track with a draggable grip
///
/// Holds only layout derived from the driver plus a cosmetic fade value. It
/// never writes the scroll value itself; gestures go through the driver.
#[derive(Debug)]
pub struct ScrollBarView {
    config: ScrollbarConfig,
    track_length: f64,
    grip_length: f64,
    grip_offset: f64,
    /// Cosmetic alpha, eased toward the hover/press target each tick
    hover_fade: f64,
    hovered: bool,
    /// A grip drag started on this bar is in progress
    pressed: bool,
    visible: bool,
    guard: FiniteGuard,
}

impl ScrollBarView {
    pub fn new(config: ScrollbarConfig) -> Self {
        let hover_fade = config.idle_alpha;
        Self {
            config,
            track_length: 0.0,
            grip_length: 0.0,
            grip_offset: 0.0,
            hover_fade,
            hovered: false,
            pressed: false,
            visible: false,
            guard: FiniteGuard::new(),
        }
    }

    pub fn config(&self) -> &ScrollbarConfig {
        &self.config
    }

    pub fn track_length(&self) -> f64 {
        self.track_length
    }

    pub fn grip_length(&self) -> f64 {
        self.grip_length
    }

    pub fn grip_offset(&self) -> f64 {
        self.grip_offset
    }

    pub fn hover_fade(&self) -> f64 {
        self.hover_fade
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Bar thickness, 0 while hidden
    pub fn thickness(&self) -> f64 {
        if self.visible {
            self.config.bar_width
        } else {
            0.0
        }
    }

    /// Recompute grip geometry for a track of `track_length`
    pub fn layout(&mut self, driver: &ScrollDriver, track_length: f64) {
        if !self.guard.check("bar_layout", &[track_length]) {
            return;
        }
        self.track_length = track_length.max(0.0);
        self.sync(driver);
    }

    /// Refresh visibility and grip geometry from the driver's current state
    pub fn sync(&mut self, driver: &ScrollDriver) {
        self.visible = driver.is_enabled();
        if !self.visible {
            self.pressed = false;
        }

        let track = self.track_length;
        self.grip_length = (driver.bar_scale() * track)
            .max(self.config.min_grip_size)
            .min(track);

        let canvas = driver.canvas_size();
        self.grip_offset = if canvas > 0.0 {
            (driver.scroll() / canvas) * (track - self.grip_length)
        } else {
            0.0
        };
    }

    /// Whether `position` (along the track) lies on the grip
    pub fn hit_grip(&self, position: f64) -> bool {
        position >= self.grip_offset && position <= self.grip_offset + self.grip_length
    }

    /// Scroll value that centres the grip under `position`
    pub fn scroll_for_position(&self, driver: &ScrollDriver, position: f64) -> f64 {
        let range = self.track_length - self.grip_length;
        if range <= 0.0 {
            return 0.0;
        }
        ((position - self.grip_length / 2.0) / range).clamp(0.0, 1.0) * driver.canvas_size()
    }

    /// Glide duration for a track click moving `distance` scroll units
    ///
    /// Longer jumps take longer so the glide speed feels consistent.
    pub fn click_duration(&self, driver: &ScrollDriver, distance: f64) -> f64 {
        let canvas = driver.canvas_size();
        let normalized = if canvas > 0.0 {
            (distance.abs() / canvas).clamp(0.0, 1.0)
        } else {
            0.0
        };
        lerp(
            self.config.click_min_duration,
            self.config.click_max_duration,
            normalized,
        )
    }

    /// Pointer pressed at `position` along the track
    ///
    /// On the grip this starts a drag; elsewhere on the track it glides the
    /// grip toward the pointer. Returns false if the gesture was not dispatched.
    pub fn pointer_down(&mut self, driver: &mut ScrollDriver, position: f64) -> bool {
        if !self.guard.check("bar_pointer_down", &[position]) {
            return false;
        }
        if !self.visible || !driver.is_enabled() {
            trace!("Pointer down on hidden scrollbar ignored");
            return false;
        }

        if self.hit_grip(position) {
            let range = self.track_length - self.grip_length;
            if range <= 0.0 {
                return false;
            }
            let ratio = driver.canvas_size() / range;
            self.pressed = driver.begin_drag_with_ratio(position, ratio);
            return self.pressed;
        }

        let target = self.scroll_for_position(driver, position);
        let duration = self.click_duration(driver, target - driver.scroll());
        driver.animate_to(target, duration);
        true
    }

    pub fn pointer_move(&mut self, driver: &mut ScrollDriver, position: f64) {
        if self.pressed {
            driver.drag_to(position);
        }
    }

    pub fn pointer_up(&mut self, driver: &mut ScrollDriver) {
        if self.pressed {
            self.pressed = false;
            driver.end_drag();
        }
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Ease the hover fade and follow the driver's position
    pub fn tick(&mut self, driver: &ScrollDriver, dt: f64) {
        if !self.guard.check("bar_tick", &[dt]) {
            return;
        }
        if self.pressed && !driver.is_dragging() {
            // Drag was pre-empted by another motion source
            self.pressed = false;
        }

        let target = if self.pressed {
            self.config.press_alpha
        } else if self.hovered {
            self.config.hover_alpha
        } else {
            self.config.idle_alpha
        };
        self.hover_fade = approach(self.hover_fade, target, self.config.fade_speed, dt.max(0.0));
        self.sync(driver);
    }
}
