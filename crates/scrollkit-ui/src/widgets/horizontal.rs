use tracing::{debug, trace};

use super::ScrollBarView;
use crate::geometry::{NodeGeometry, NodeId};
use crate::scroll::{
    AnimationRequest, Axis, FiniteGuard, ScrollConfig, ScrollDriver, ScrollMode, ScrollbarConfig,
};

/// Content panning state; the container origin is resolved once per gesture
#[derive(Debug, Clone, Copy, PartialEq)]
struct CanvasDrag {
    origin_x: f64,
}

/// Horizontal scroll driver with grip and content-drag gestures
///
/// Runs the same state machine as the vertical driver with its own tuning.
/// A drag can start on the grip or directly on the content canvas.
#[derive(Debug)]
pub struct HorizontalScrollDriver {
    driver: ScrollDriver,
    bar: ScrollBarView,
    canvas_drag: Option<CanvasDrag>,
    guard: FiniteGuard,
}

impl Default for HorizontalScrollDriver {
    fn default() -> Self {
        Self::new(ScrollConfig::horizontal(), ScrollbarConfig::default())
    }
}

impl HorizontalScrollDriver {
    pub fn new(config: ScrollConfig, bar_config: ScrollbarConfig) -> Self {
        Self {
            driver: ScrollDriver::new(Axis::Horizontal, config),
            bar: ScrollBarView::new(bar_config),
            canvas_drag: None,
            guard: FiniteGuard::new(),
        }
    }

    pub fn driver(&self) -> &ScrollDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut ScrollDriver {
        &mut self.driver
    }

    pub fn bar(&self) -> &ScrollBarView {
        &self.bar
    }

    pub fn scroll(&self) -> f64 {
        self.driver.scroll()
    }

    pub fn offset(&self) -> f64 {
        self.driver.offset()
    }

    pub fn mode(&self) -> ScrollMode {
        self.driver.mode()
    }

    pub fn is_enabled(&self) -> bool {
        self.driver.is_enabled()
    }

    pub fn is_canvas_dragging(&self) -> bool {
        self.canvas_drag.is_some()
    }

    /// Container origin captured at the start of the current content drag
    pub fn cached_origin(&self) -> Option<f64> {
        self.canvas_drag.map(|d| d.origin_x)
    }

    /// Recompute scrollable width and the bar along a track of `track_length`
    pub fn configure(&mut self, viewport_width: f64, content_width: f64, track_length: f64) {
        self.driver.configure(viewport_width, content_width);
        self.bar.layout(&self.driver, track_length);
    }

    pub fn set_scroll(&mut self, value: f64) {
        self.canvas_drag = None;
        self.driver.set_scroll(value);
        self.bar.sync(&self.driver);
    }

    pub fn animate(&mut self, request: AnimationRequest) {
        self.canvas_drag = None;
        self.driver.animate(request);
    }

    pub fn wheel(&mut self, delta: f64) {
        self.driver.wheel(delta);
    }

    /// Pointer pressed on the scrollbar track at `position`
    pub fn pointer_down_on_bar(&mut self, position: f64) -> bool {
        self.canvas_drag = None;
        self.bar.pointer_down(&mut self.driver, position)
    }

    /// Pointer pressed on the content at screen-space `pointer_x`
    ///
    /// Dragging the content right reveals what is to its left, so the drag
    /// ratio is -1. Returns false when the container no longer resolves or
    /// the driver is disabled.
    pub fn begin_canvas_drag<G: NodeGeometry>(
        &mut self,
        geometry: &G,
        container: NodeId,
        pointer_x: f64,
    ) -> bool {
        if !self.guard.check("begin_canvas_drag", &[pointer_x]) {
            return false;
        }
        let Some(origin) = geometry.screen_origin(container) else {
            trace!("Canvas drag on a container that no longer exists");
            return false;
        };
        if !self.driver.begin_drag_with_ratio(pointer_x - origin.x, -1.0) {
            return false;
        }
        debug!(origin_x = origin.x, "Canvas drag started");
        self.canvas_drag = Some(CanvasDrag { origin_x: origin.x });
        true
    }

    /// Pointer moved. Screen-space during a content drag, track-local otherwise.
    pub fn pointer_move(&mut self, position: f64) {
        match self.canvas_drag {
            Some(drag) => self.driver.drag_to(position - drag.origin_x),
            None => self.bar.pointer_move(&mut self.driver, position),
        }
    }

    pub fn pointer_up(&mut self) {
        if self.canvas_drag.take().is_some() {
            self.driver.end_drag();
        } else {
            self.bar.pointer_up(&mut self.driver);
        }
        self.bar.sync(&self.driver);
    }

    pub fn set_bar_hovered(&mut self, hovered: bool) {
        self.bar.set_hovered(hovered);
    }

    /// Advance one frame; returns the new offset when it changed
    pub fn advance(&mut self, dt: f64) -> Option<f64> {
        let changed = self.driver.advance(dt);
        if self.canvas_drag.is_some() && !self.driver.is_dragging() {
            self.canvas_drag = None;
        }
        self.bar.tick(&self.driver, dt);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, SceneGraph, Size};

    const FRAME: f64 = 1.0 / 60.0;

    fn setup() -> (HorizontalScrollDriver, SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let container = graph.add_root(Point::new(50.0, 0.0), Size::new(200.0, 100.0));
        let mut driver = HorizontalScrollDriver::default();
        driver.configure(200.0, 600.0, 200.0);
        (driver, graph, container)
    }

    #[test]
    fn test_uses_horizontal_tuning() {
        let (driver, _, _) = setup();
        assert_eq!(driver.driver().axis(), Axis::Horizontal);
        assert_eq!(driver.driver().config(), &ScrollConfig::horizontal());
        assert_eq!(driver.driver().canvas_size(), 400.0);
    }

    #[test]
    fn test_canvas_drag_pans_opposite_to_pointer() {
        let (mut driver, graph, container) = setup();
        driver.set_scroll(100.0);
        assert!(driver.begin_canvas_drag(&graph, container, 150.0));
        assert_eq!(driver.mode(), ScrollMode::Dragging);

        driver.pointer_move(120.0);
        driver.advance(FRAME);
        assert_eq!(driver.scroll(), 130.0);

        driver.pointer_move(400.0);
        driver.advance(FRAME);
        assert_eq!(driver.scroll(), 0.0);

        driver.pointer_up();
        assert!(!driver.is_canvas_dragging());
        assert_eq!(driver.mode(), ScrollMode::Idle);
    }

    #[test]
    fn test_canvas_drag_uses_origin_cached_at_start() {
        let (mut driver, mut graph, container) = setup();
        driver.set_scroll(100.0);
        assert!(driver.begin_canvas_drag(&graph, container, 150.0));

        // Container slides mid-gesture; the drag keeps its original frame
        graph.set_local_position(container, Point::new(80.0, 0.0));
        driver.pointer_move(120.0);
        driver.advance(FRAME);

        assert_eq!(driver.cached_origin(), Some(50.0));
        assert_eq!(driver.scroll(), 130.0);
    }

    #[test]
    fn test_canvas_drag_on_removed_container() {
        let (mut driver, mut graph, container) = setup();
        graph.remove(container);
        assert!(!driver.begin_canvas_drag(&graph, container, 10.0));
        assert_eq!(driver.mode(), ScrollMode::Idle);
    }

    #[test]
    fn test_canvas_drag_ignored_when_content_fits() {
        let (mut driver, graph, container) = setup();
        driver.configure(200.0, 150.0, 200.0);
        assert!(!driver.begin_canvas_drag(&graph, container, 60.0));
        assert!(!driver.bar().is_visible());
    }

    #[test]
    fn test_grip_drag_still_available() {
        let (mut driver, _, _) = setup();
        // bar scale 1/3 of a 200 px track
        assert!(driver.pointer_down_on_bar(10.0));
        assert!(!driver.is_canvas_dragging());
        driver.pointer_move(43.0);
        driver.advance(FRAME);
        assert!(driver.scroll() > 0.0);
        driver.pointer_up();
        assert_eq!(driver.mode(), ScrollMode::Idle);
    }

    #[test]
    fn test_animation_cancels_canvas_drag() {
        let (mut driver, graph, container) = setup();
        driver.begin_canvas_drag(&graph, container, 100.0);
        driver.animate(AnimationRequest::new(200.0, 0.5));
        assert!(!driver.is_canvas_dragging());
        assert_eq!(driver.mode(), ScrollMode::ClickAnimating);
    }
}
