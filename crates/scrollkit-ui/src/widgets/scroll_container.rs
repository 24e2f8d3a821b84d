use scrollkit_core::{BarDock, EngineConfig};
use tracing::{debug, trace};

use super::ScrollBarView;
use crate::event::{InputEvent, PointerTarget};
use crate::geometry::{NodeGeometry, NodeId, Point, Size};
use crate::scroll::{
    AnimationRequest, Axis, CompletionCallback, FiniteGuard, ScrollConfig, ScrollDriver,
    ScrollbarConfig,
};

/// Vertical scroll container: a content canvas moved by a driver + bar pair
///
/// The container only reads the scroll value; every change goes through the
/// driver. The canvas is repositioned whenever the driver's offset differs
/// from the last placement.
#[derive(Debug)]
pub struct ScrollContainer {
    canvas: NodeId,
    driver: ScrollDriver,
    bar: ScrollBarView,
    viewport: Size,
    content_extent: f64,
    canvas_position: Point,
    guard: FiniteGuard,
}

impl ScrollContainer {
    pub fn new(canvas: NodeId, config: ScrollConfig, bar_config: ScrollbarConfig) -> Self {
        Self {
            canvas,
            driver: ScrollDriver::new(Axis::Vertical, config),
            bar: ScrollBarView::new(bar_config),
            viewport: Size::default(),
            content_extent: 0.0,
            canvas_position: Point::ZERO,
            guard: FiniteGuard::new(),
        }
    }

    /// Build from the `[vertical]` and `[scrollbar]` sections of an engine config
    pub fn from_config(canvas: NodeId, config: &EngineConfig) -> Self {
        Self::new(canvas, config.vertical.clone(), config.scrollbar.clone())
    }

    pub fn canvas(&self) -> NodeId {
        self.canvas
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

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Where the canvas was last placed, relative to the container
    pub fn canvas_position(&self) -> Point {
        self.canvas_position
    }

    pub fn scroll(&self) -> f64 {
        self.driver.scroll()
    }

    pub fn is_enabled(&self) -> bool {
        self.driver.is_enabled()
    }

    /// Width available to content once the bar takes its share
    pub fn inner_width(&self) -> f64 {
        (self.viewport.width - self.bar.thickness()).max(0.0)
    }

    /// Layout pass: feed extents to the driver, lay out the bar, place the canvas
    pub fn perform_layout<G: NodeGeometry>(
        &mut self,
        geometry: &mut G,
        viewport: Size,
        content_extent: f64,
    ) {
        if !self
            .guard
            .check("perform_layout", &[viewport.width, viewport.height, content_extent])
        {
            return;
        }
        self.viewport = viewport;
        self.content_extent = content_extent;
        self.driver.configure(viewport.height, content_extent);
        self.bar.layout(&self.driver, viewport.height);
        self.place_canvas(geometry);
    }

    /// Advance one frame. Returns the new offset if the canvas moved.
    pub fn tick<G: NodeGeometry>(&mut self, geometry: &mut G, dt: f64) -> Option<f64> {
        self.driver.advance(dt);
        self.bar.tick(&self.driver, dt);
        self.follow_driver(geometry)
    }

    /// Route one input event. Returns true if it was consumed.
    ///
    /// Releasing a grip drag applies the last pointer position right away, so
    /// the canvas is re-placed before returning.
    pub fn dispatch<G: NodeGeometry>(&mut self, geometry: &mut G, event: InputEvent) -> bool {
        let consumed = match event {
            InputEvent::PointerDown {
                target: PointerTarget::Bar,
                position,
            } => self.bar.pointer_down(&mut self.driver, position),
            InputEvent::PointerDown {
                target: PointerTarget::Canvas,
                ..
            } => false,
            InputEvent::PointerMove { position } => {
                self.bar.pointer_move(&mut self.driver, position);
                self.bar.is_pressed()
            }
            InputEvent::PointerUp => {
                let was_pressed = self.bar.is_pressed();
                self.bar.pointer_up(&mut self.driver);
                was_pressed
            }
            InputEvent::BarHover { hovered } => {
                self.bar.set_hovered(hovered);
                true
            }
            InputEvent::Wheel { delta } => {
                self.on_mouse_wheel(delta);
                true
            }
        };
        self.follow_driver(geometry);
        consumed
    }

    /// Forwarded verbatim to the driver
    pub fn on_mouse_wheel(&mut self, delta: f64) {
        self.driver.wheel(delta);
    }

    pub fn set_scroll<G: NodeGeometry>(&mut self, geometry: &mut G, value: f64) {
        self.driver.set_scroll(value);
        self.follow_driver(geometry);
    }

    /// Hard reset to the top, dropping any motion in progress
    pub fn clear<G: NodeGeometry>(&mut self, geometry: &mut G) {
        self.driver.cancel();
        self.driver.set_scroll(0.0);
        self.follow_driver(geometry);
    }

    /// Start an animation. A zero-duration request lands immediately.
    pub fn scroll_to<G: NodeGeometry>(&mut self, geometry: &mut G, request: AnimationRequest) {
        self.driver.animate(request);
        self.follow_driver(geometry);
    }

    /// `duration` of `None` uses the axis' configured `default_duration`
    pub fn scroll_to_top<G: NodeGeometry>(
        &mut self,
        geometry: &mut G,
        duration: Option<f64>,
        on_complete: Option<CompletionCallback>,
    ) {
        let request = self.request(0.0, duration, on_complete);
        self.scroll_to(geometry, request);
    }

    pub fn scroll_to_bottom<G: NodeGeometry>(
        &mut self,
        geometry: &mut G,
        duration: Option<f64>,
        on_complete: Option<CompletionCallback>,
    ) {
        let bottom = self.driver.canvas_size();
        let request = self.request(bottom, duration, on_complete);
        self.scroll_to(geometry, request);
    }

    /// Animate so that `child` ends up centred in the viewport
    ///
    /// The child is located through screen space so it resolves correctly
    /// inside nested containers. A child that no longer exists is ignored.
    pub fn scroll_to_child<G: NodeGeometry>(
        &mut self,
        geometry: &mut G,
        child: NodeId,
        duration: Option<f64>,
        on_complete: Option<CompletionCallback>,
    ) -> bool {
        let resolved = geometry
            .screen_origin(self.canvas)
            .zip(geometry.screen_origin(child))
            .zip(geometry.size(child));
        let Some(((canvas_origin, child_origin), child_size)) = resolved else {
            trace!(?child, "scroll_to_child on a node that no longer resolves");
            return false;
        };

        let child_y = child_origin.y - canvas_origin.y;
        let target = child_y + child_size.height / 2.0 - self.viewport.height / 2.0;
        debug!(?child, child_y, target, "Scrolling to child");
        let request = self.request(target, duration, on_complete);
        self.scroll_to(geometry, request);
        true
    }

    fn request(
        &self,
        target: f64,
        duration: Option<f64>,
        on_complete: Option<CompletionCallback>,
    ) -> AnimationRequest {
        let duration = duration.unwrap_or(self.driver.config().default_duration);
        AnimationRequest {
            on_complete,
            ..AnimationRequest::new(target, duration)
        }
    }

    /// Sync the bar and move the canvas if the driver's offset changed
    fn follow_driver<G: NodeGeometry>(&mut self, geometry: &mut G) -> Option<f64> {
        self.bar.sync(&self.driver);
        if self.driver.offset() == self.canvas_position.y {
            return None;
        }
        self.place_canvas(geometry);
        Some(self.canvas_position.y)
    }

    fn place_canvas<G: NodeGeometry>(&mut self, geometry: &mut G) {
        let x = match self.bar.config().dock {
            BarDock::Leading => self.bar.thickness(),
            BarDock::Trailing => 0.0,
        };
        let position = Point::new(x, self.driver.offset());
        if !geometry.set_local_position(self.canvas, position) {
            trace!(canvas = ?self.canvas, "Canvas node is gone, placement skipped");
        }
        self.canvas_position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SceneGraph;
    use crate::scroll::ScrollMode;
    use std::cell::Cell;
    use std::rc::Rc;

    const FRAME: f64 = 1.0 / 60.0;

    struct Fixture {
        graph: SceneGraph,
        container: ScrollContainer,
        items: Vec<NodeId>,
    }

    /// 200x100 viewport with ten 40px rows (content 400, canvas 300)
    fn fixture(dock: BarDock) -> Fixture {
        let mut graph = SceneGraph::new();
        let frame = graph.add_root(Point::new(30.0, 70.0), Size::new(200.0, 100.0));
        let canvas = graph
            .add_child(frame, Point::ZERO, Size::new(200.0, 400.0))
            .unwrap();
        let items = (0..10)
            .map(|i| {
                graph
                    .add_child(canvas, Point::new(0.0, i as f64 * 40.0), Size::new(200.0, 40.0))
                    .unwrap()
            })
            .collect();

        let bar_config = ScrollbarConfig {
            dock,
            ..ScrollbarConfig::default()
        };
        let mut container = ScrollContainer::new(canvas, ScrollConfig::vertical(), bar_config);
        let extent = graph.content_extent(canvas, Axis::Vertical);
        container.perform_layout(&mut graph, Size::new(200.0, 100.0), extent);
        Fixture {
            graph,
            container,
            items,
        }
    }

    fn run(fx: &mut Fixture, seconds: f64) {
        let frames = (seconds / FRAME).ceil() as usize;
        for _ in 0..frames {
            fx.container.tick(&mut fx.graph, FRAME);
        }
    }

    #[test]
    fn test_layout_configures_driver() {
        let fx = fixture(BarDock::Trailing);
        assert!(fx.container.is_enabled());
        assert_eq!(fx.container.driver().canvas_size(), 300.0);
        assert!(fx.container.bar().is_visible());
        assert_eq!(fx.container.inner_width(), 192.0);
        assert_eq!(fx.container.canvas_position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_leading_dock_shifts_canvas() {
        let fx = fixture(BarDock::Leading);
        assert_eq!(fx.container.canvas_position().x, 8.0);
        assert_eq!(fx.graph.local_position(fx.container.canvas()), Some(Point::new(8.0, 0.0)));
    }

    #[test]
    fn test_tick_moves_canvas() {
        let mut fx = fixture(BarDock::Trailing);
        fx.container.scroll_to_bottom(&mut fx.graph, Some(0.2), None);
        run(&mut fx, 0.5);
        assert_eq!(fx.container.scroll(), 300.0);
        assert_eq!(
            fx.graph.local_position(fx.container.canvas()),
            Some(Point::new(0.0, -300.0))
        );
        assert_eq!(fx.container.tick(&mut fx.graph, FRAME), None);
    }

    #[test]
    fn test_scroll_to_top_fires_callback() {
        let mut fx = fixture(BarDock::Trailing);
        fx.container.set_scroll(&mut fx.graph, 250.0);
        let done = Rc::new(Cell::new(false));
        let d = Rc::clone(&done);
        fx.container
            .scroll_to_top(&mut fx.graph, Some(0.3), Some(Box::new(move || d.set(true))));
        run(&mut fx, 0.5);
        assert!(done.get());
        assert_eq!(fx.container.scroll(), 0.0);
        assert_eq!(fx.container.canvas_position().y, 0.0);
    }

    #[test]
    fn test_scroll_to_child_centres_it() {
        let mut fx = fixture(BarDock::Trailing);
        let child = fx.items[5];
        assert!(fx.container.scroll_to_child(&mut fx.graph, child, Some(0.25), None));
        run(&mut fx, 0.5);
        // row 5 spans 200..240; centred in a 100px viewport
        assert_eq!(fx.container.scroll(), 170.0);
    }

    #[test]
    fn test_scroll_to_child_after_scrolling() {
        let mut fx = fixture(BarDock::Trailing);
        fx.container.set_scroll(&mut fx.graph, 100.0);
        fx.container.tick(&mut fx.graph, FRAME);
        assert!(fx.container.scroll_to_child(&mut fx.graph, fx.items[1], Some(0.2), None));
        run(&mut fx, 0.5);
        // row 1 spans 40..80
        assert_eq!(fx.container.scroll(), 10.0);
    }

    #[test]
    fn test_scroll_to_removed_child_is_noop() {
        let mut fx = fixture(BarDock::Trailing);
        let child = fx.items[7];
        fx.graph.remove(child);
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        assert!(!fx
            .container
            .scroll_to_child(&mut fx.graph, child, Some(0.2), Some(Box::new(move || f.set(true)))));
        run(&mut fx, 0.5);
        assert_eq!(fx.container.scroll(), 0.0);
        assert!(!fired.get());
    }

    #[test]
    fn test_scroll_to_child_in_nested_container() {
        let mut fx = fixture(BarDock::Trailing);
        let outer_canvas = fx.container.canvas();
        // Inner container at y=200 of the outer canvas, its own canvas scrolled by 30
        let inner_frame = fx
            .graph
            .add_child(outer_canvas, Point::new(0.0, 200.0), Size::new(200.0, 60.0))
            .unwrap();
        let inner_canvas = fx
            .graph
            .add_child(inner_frame, Point::new(0.0, -30.0), Size::new(200.0, 120.0))
            .unwrap();
        let deep = fx
            .graph
            .add_child(inner_canvas, Point::new(0.0, 80.0), Size::new(200.0, 20.0))
            .unwrap();
        fx.container
            .perform_layout(&mut fx.graph, Size::new(200.0, 100.0), 400.0);

        assert!(fx.container.scroll_to_child(&mut fx.graph, deep, Some(0.2), None));
        run(&mut fx, 0.5);
        // child sits at 200 - 30 + 80 = 250 in the outer canvas
        assert_eq!(fx.container.scroll(), 210.0);
    }

    #[test]
    fn test_content_shrinks_to_fit() {
        let mut fx = fixture(BarDock::Trailing);
        fx.container.set_scroll(&mut fx.graph, 200.0);
        fx.container
            .perform_layout(&mut fx.graph, Size::new(200.0, 100.0), 80.0);

        assert!(!fx.container.is_enabled());
        assert!(!fx.container.bar().is_visible());
        assert_eq!(fx.container.scroll(), 0.0);
        assert_eq!(fx.container.canvas_position().y, 0.0);
        assert_eq!(fx.container.inner_width(), 200.0);

        fx.container.scroll_to_bottom(&mut fx.graph, Some(0.2), None);
        assert_eq!(fx.container.driver().mode(), ScrollMode::Idle);
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut fx = fixture(BarDock::Trailing);
        assert!(fx.container.dispatch(&mut fx.graph, InputEvent::Wheel { delta: -1.0 }));
        assert_eq!(fx.container.driver().mode(), ScrollMode::WheelMomentum);

        assert!(fx.container.dispatch(&mut fx.graph, InputEvent::BarHover { hovered: true }));
        assert!(fx.container.bar().is_hovered());

        assert!(!fx.container.dispatch(&mut fx.graph, InputEvent::PointerDown {
            target: PointerTarget::Canvas,
            position: 10.0,
        }));

        // grip spans 0..25 on a 100px track
        assert!(fx.container.dispatch(&mut fx.graph, InputEvent::PointerDown {
            target: PointerTarget::Bar,
            position: 5.0,
        }));
        assert_eq!(fx.container.driver().mode(), ScrollMode::Dragging);
        assert!(fx.container.dispatch(&mut fx.graph, InputEvent::PointerMove { position: 15.0 }));
        assert!(fx.container.dispatch(&mut fx.graph, InputEvent::PointerUp));
        assert_eq!(fx.container.driver().mode(), ScrollMode::Idle);
        assert!(fx.container.scroll() > 0.0);
    }

    #[test]
    fn test_clear_resets() {
        let mut fx = fixture(BarDock::Trailing);
        fx.container.scroll_to_bottom(&mut fx.graph, Some(1.0), None);
        run(&mut fx, 0.3);
        fx.container.clear(&mut fx.graph);
        assert_eq!(fx.container.scroll(), 0.0);
        assert_eq!(fx.container.driver().mode(), ScrollMode::Idle);
        assert_eq!(
            fx.graph.local_position(fx.container.canvas()),
            Some(Point::new(0.0, 0.0))
        );
        assert_eq!(fx.container.bar().grip_offset(), 0.0);
    }

    #[test]
    fn test_set_scroll_places_canvas_without_a_frame() {
        let mut fx = fixture(BarDock::Trailing);
        fx.container.set_scroll(&mut fx.graph, 120.0);
        assert_eq!(
            fx.graph.local_position(fx.container.canvas()),
            Some(Point::new(0.0, -120.0))
        );
        assert_eq!(fx.container.canvas_position().y, -120.0);
        // nothing left for the next frame to move
        assert_eq!(fx.container.tick(&mut fx.graph, FRAME), None);
    }

    #[test]
    fn test_zero_duration_navigation_places_canvas() {
        let mut fx = fixture(BarDock::Trailing);
        fx.container.scroll_to_bottom(&mut fx.graph, Some(0.0), None);
        assert_eq!(
            fx.graph.local_position(fx.container.canvas()),
            Some(Point::new(0.0, -300.0))
        );
    }

    #[test]
    fn test_pointer_up_places_canvas() {
        let mut fx = fixture(BarDock::Trailing);
        // grip spans 0..25; free range 75 px for 300 scroll units
        fx.container.dispatch(
            &mut fx.graph,
            InputEvent::PointerDown {
                target: PointerTarget::Bar,
                position: 5.0,
            },
        );
        fx.container
            .dispatch(&mut fx.graph, InputEvent::PointerMove { position: 20.0 });
        fx.container.dispatch(&mut fx.graph, InputEvent::PointerUp);
        assert_eq!(fx.container.scroll(), 60.0);
        assert_eq!(fx.container.canvas_position().y, -60.0);
    }

    #[test]
    fn test_navigation_uses_configured_default_duration() {
        let mut fx = fixture(BarDock::Trailing);
        let mut config = fx.container.driver().config().clone();
        config.default_duration = 0.5;
        fx.container.driver_mut().set_config(config);

        fx.container.scroll_to_bottom(&mut fx.graph, None, None);
        assert_eq!(fx.container.driver().mode(), ScrollMode::ClickAnimating);
        run(&mut fx, 0.25);
        assert!((fx.container.scroll() - 150.0).abs() < 15.0);
        assert_eq!(fx.container.driver().mode(), ScrollMode::ClickAnimating);

        run(&mut fx, 0.3);
        assert_eq!(fx.container.scroll(), 300.0);
        assert_eq!(fx.container.driver().mode(), ScrollMode::Idle);
    }

    #[test]
    fn test_from_config() {
        let mut config = EngineConfig::default();
        config.vertical.wheel_force = 42.0;
        let mut graph = SceneGraph::new();
        let canvas = graph.add_root(Point::ZERO, Size::new(100.0, 100.0));
        let container = ScrollContainer::from_config(canvas, &config);
        assert_eq!(container.driver().config().wheel_force, 42.0);
    }
}
