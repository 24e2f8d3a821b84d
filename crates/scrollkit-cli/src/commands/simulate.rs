use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use scrollkit_core::EngineConfig;
use scrollkit_ui::{
    AnimationRequest, HorizontalScrollDriver, InputEvent, NodeGeometry, NodeId, Point,
    PointerTarget, SceneGraph, ScrollContainer, ScrollDriver, Size,
};

use crate::scenario::{Scenario, ScenarioAxis, Step};

/// One simulated frame as printed by the trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time: f64,
    pub mode: String,
    pub scroll: f64,
    pub offset: f64,
    pub velocity: f64,
    pub grip_offset: f64,
    pub grip_length: f64,
    /// Screen-space position of the content's leading edge along the axis
    pub content_origin: f64,
    /// Animation completion callbacks fired so far
    pub completed: u32,
}

/// The scroll surface under test, one per axis flavour
enum Rig {
    Vertical {
        container: ScrollContainer,
    },
    Horizontal {
        driver: HorizontalScrollDriver,
        container: NodeId,
    },
}

pub struct Simulator {
    rig: Rig,
    graph: SceneGraph,
    frame_dt: f64,
    frame: u64,
    completed: Rc<Cell<u32>>,
}

impl Simulator {
    pub fn new(scenario: &Scenario, config: &EngineConfig) -> Result<Self> {
        let mut graph = SceneGraph::new();
        let frame_dt = 1.0 / config.general.frame_rate.max(1) as f64;

        let rig = match scenario.axis {
            ScenarioAxis::Vertical => {
                let frame = graph.add_root(
                    Point::new(0.0, scenario.origin),
                    Size::new(scenario.viewport, scenario.viewport),
                );
                let canvas = graph
                    .add_child(frame, Point::ZERO, Size::new(scenario.viewport, scenario.content))
                    .ok_or_else(|| anyhow!("container frame vanished before its canvas was added"))?;
                let mut container = ScrollContainer::from_config(canvas, config);
                container.perform_layout(
                    &mut graph,
                    Size::new(scenario.viewport, scenario.viewport),
                    scenario.content,
                );
                Rig::Vertical { container }
            }
            ScenarioAxis::Horizontal => {
                let container = graph.add_root(
                    Point::new(scenario.origin, 0.0),
                    Size::new(scenario.viewport, scenario.viewport),
                );
                let mut driver = HorizontalScrollDriver::new(
                    config.horizontal.clone(),
                    config.scrollbar.clone(),
                );
                driver.configure(scenario.viewport, scenario.content, scenario.viewport);
                Rig::Horizontal { driver, container }
            }
        };

        Ok(Self {
            rig,
            graph,
            frame_dt,
            frame: 0,
            completed: Rc::new(Cell::new(0)),
        })
    }

    pub fn frame_dt(&self) -> f64 {
        self.frame_dt
    }

    fn driver(&self) -> &ScrollDriver {
        match &self.rig {
            Rig::Vertical { container } => container.driver(),
            Rig::Horizontal { driver, .. } => driver.driver(),
        }
    }

    /// Whether motion is still in progress
    pub fn is_moving(&self) -> bool {
        self.driver().needs_update()
    }

    fn completion_callback(&self) -> impl FnOnce() + 'static {
        let completed = Rc::clone(&self.completed);
        move || {
            completed.set(completed.get() + 1);
            info!(count = completed.get(), "Animation complete");
        }
    }

    /// Apply one non-`wait` step between frames
    pub fn apply(&mut self, step: &Step) {
        debug!(?step, "Applying step");
        let on_complete = self.completion_callback();
        let graph = &mut self.graph;
        match (&mut self.rig, step) {
            (Rig::Vertical { container }, step) => match *step {
                Step::Wheel { delta } => container.on_mouse_wheel(delta),
                Step::Animate {
                    target,
                    duration,
                    delay,
                } => container.scroll_to(
                    graph,
                    AnimationRequest::new(target, duration)
                        .delay(delay)
                        .on_complete(on_complete),
                ),
                Step::Set { value } => container.set_scroll(graph, value),
                Step::PointerDown { position } => {
                    container.dispatch(
                        graph,
                        InputEvent::PointerDown {
                            target: PointerTarget::Bar,
                            position,
                        },
                    );
                }
                Step::PointerMove { position } => {
                    container.dispatch(graph, InputEvent::PointerMove { position });
                }
                Step::PointerUp => {
                    container.dispatch(graph, InputEvent::PointerUp);
                }
                Step::Hover { hovered } => {
                    container.dispatch(graph, InputEvent::BarHover { hovered });
                }
                Step::Configure { viewport, content } => {
                    container.perform_layout(graph, Size::new(viewport, viewport), content)
                }
                Step::ScrollToTop { duration } => {
                    container.scroll_to_top(graph, duration, Some(Box::new(on_complete)))
                }
                Step::ScrollToBottom { duration } => {
                    container.scroll_to_bottom(graph, duration, Some(Box::new(on_complete)))
                }
                Step::CanvasDragStart { .. } => {
                    warn!("canvas_drag_start is not supported on a vertical container");
                }
                Step::Wait { .. } => {}
            },
            (Rig::Horizontal { driver, container }, step) => match *step {
                Step::Wheel { delta } => driver.wheel(delta),
                Step::Animate {
                    target,
                    duration,
                    delay,
                } => driver.animate(
                    AnimationRequest::new(target, duration)
                        .delay(delay)
                        .on_complete(on_complete),
                ),
                Step::Set { value } => driver.set_scroll(value),
                Step::PointerDown { position } => {
                    driver.pointer_down_on_bar(position);
                }
                Step::CanvasDragStart { position } => {
                    driver.begin_canvas_drag(&*graph, *container, position);
                }
                Step::PointerMove { position } => driver.pointer_move(position),
                Step::PointerUp => driver.pointer_up(),
                Step::Hover { hovered } => driver.set_bar_hovered(hovered),
                Step::Configure { viewport, content } => {
                    driver.configure(viewport, content, viewport)
                }
                Step::ScrollToTop { duration } => {
                    let duration = duration.unwrap_or(driver.driver().config().default_duration);
                    driver.animate(AnimationRequest::new(0.0, duration).on_complete(on_complete))
                }
                Step::ScrollToBottom { duration } => {
                    let duration = duration.unwrap_or(driver.driver().config().default_duration);
                    let bottom = driver.driver().canvas_size();
                    driver.animate(
                        AnimationRequest::new(bottom, duration).on_complete(on_complete),
                    )
                }
                Step::Wait { .. } => {}
            },
        }
    }

    /// Advance one frame and describe the result
    pub fn tick(&mut self) -> FrameRecord {
        let dt = self.frame_dt;
        match &mut self.rig {
            Rig::Vertical { container } => {
                container.tick(&mut self.graph, dt);
            }
            Rig::Horizontal { driver, .. } => {
                driver.advance(dt);
            }
        }
        self.frame += 1;
        self.record()
    }

    pub fn record(&self) -> FrameRecord {
        let driver = self.driver();
        let (bar, content_origin) = match &self.rig {
            Rig::Vertical { container } => (
                container.bar(),
                self.graph
                    .screen_origin(container.canvas())
                    .map_or(0.0, |origin| origin.y),
            ),
            Rig::Horizontal { driver, container } => (
                driver.bar(),
                self.graph
                    .screen_origin(*container)
                    .map_or(0.0, |origin| origin.x)
                    + driver.offset(),
            ),
        };
        FrameRecord {
            frame: self.frame,
            time: driver.clock(),
            mode: format!("{:?}", driver.mode()),
            scroll: driver.scroll(),
            offset: driver.offset(),
            velocity: driver.smooth_velocity(),
            grip_offset: bar.grip_offset(),
            grip_length: bar.grip_length(),
            content_origin,
            completed: self.completed.get(),
        }
    }
}

/// Number of frames covering `seconds`
fn frames_for(seconds: f64, frame_dt: f64) -> u64 {
    (seconds / frame_dt).round().max(0.0) as u64
}

/// Run a scenario to completion, handing every frame to `sink`
///
/// With `realtime` the frames are paced on a tokio interval at the configured
/// frame rate; otherwise they run back to back.
pub async fn simulate<F>(
    scenario: &Scenario,
    config: &EngineConfig,
    realtime: bool,
    mut sink: F,
) -> Result<FrameRecord>
where
    F: FnMut(&FrameRecord),
{
    let mut sim = Simulator::new(scenario, config)?;
    let mut interval = realtime
        .then(|| tokio::time::interval(Duration::from_secs_f64(sim.frame_dt())));

    for step in &scenario.steps {
        let Step::Wait { seconds } = step else {
            sim.apply(step);
            continue;
        };
        for _ in 0..frames_for(*seconds, sim.frame_dt()) {
            if let Some(interval) = interval.as_mut() {
                interval.tick().await;
            }
            sink(&sim.tick());
        }
    }

    let settle_frames = frames_for(scenario.settle_limit, sim.frame_dt());
    let mut settled = 0;
    while sim.is_moving() && settled < settle_frames {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }
        sink(&sim.tick());
        settled += 1;
    }
    if sim.is_moving() {
        warn!(
            limit_secs = scenario.settle_limit,
            "Scenario still moving when the settle limit was reached"
        );
    }

    Ok(sim.record())
}

pub async fn run(config: &EngineConfig, path: &Path, json: bool, realtime: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    info!(
        scenario = %scenario.title(),
        steps = scenario.steps.len(),
        frame_rate = config.general.frame_rate,
        "Running scenario"
    );

    if !json {
        println!("Scenario: {}", scenario.title());
        println!(
            "{:>6} {:>8} {:<15} {:>10} {:>10} {:>9}",
            "frame", "time", "mode", "scroll", "velocity", "grip"
        );
    }

    let last = simulate(&scenario, config, realtime, |record| {
        if json {
            match serde_json::to_string(record) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!(error = %e, "Failed to serialize frame"),
            }
        } else {
            println!(
                "{:>6} {:>8.3} {:<15} {:>10.2} {:>10.3} {:>9.2}",
                record.frame,
                record.time,
                record.mode,
                record.scroll,
                record.velocity,
                record.grip_offset
            );
        }
    })
    .await?;

    if !json {
        println!(
            "\nFinal: scroll {:.2} (offset {:.2}), mode {}, {} animation(s) completed",
            last.scroll, last.offset, last.mode, last.completed
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(steps: Vec<Step>) -> Scenario {
        Scenario {
            name: None,
            axis: ScenarioAxis::Vertical,
            viewport: 100.0,
            content: 600.0,
            origin: 0.0,
            settle_limit: 5.0,
            steps,
        }
    }

    #[tokio::test]
    async fn test_animation_scenario_converges() {
        let scenario = vertical(vec![
            Step::Animate {
                target: 500.0,
                duration: 1.0,
                delay: 0.0,
            },
            Step::Wait { seconds: 0.5 },
        ]);
        let mut mid = None;
        let last = simulate(&scenario, &EngineConfig::default(), false, |record| {
            if record.frame == 30 {
                mid = Some(record.scroll);
            }
        })
        .await
        .unwrap();

        assert!((mid.unwrap() - 250.0).abs() < 1.0);
        assert_eq!(last.scroll, 500.0);
        assert_eq!(last.offset, -500.0);
        assert_eq!(last.mode, "Idle");
        assert_eq!(last.completed, 1);
    }

    #[tokio::test]
    async fn test_drag_scenario_clamps() {
        let scenario = vertical(vec![
            Step::Set { value: 100.0 },
            // grip: scale 1/6 of 100px -> 20px at offset 100/500*80 = 16
            Step::PointerDown { position: 20.0 },
            Step::PointerMove { position: 28.0 },
            Step::Wait { seconds: 0.1 },
            Step::PointerMove { position: 500.0 },
            Step::Wait { seconds: 0.1 },
            Step::PointerUp,
        ]);
        let last = simulate(&scenario, &EngineConfig::default(), false, |_| {})
            .await
            .unwrap();
        assert_eq!(last.scroll, 500.0);
        assert_eq!(last.mode, "Idle");
    }

    #[tokio::test]
    async fn test_wheel_scenario_settles() {
        let scenario = vertical(vec![Step::Wheel { delta: -1.0 }]);
        let mut frames = 0;
        let last = simulate(&scenario, &EngineConfig::default(), false, |_| frames += 1)
            .await
            .unwrap();
        assert!(frames > 0);
        assert!(last.scroll > 0.0);
        assert_eq!(last.velocity, 0.0);
        assert_eq!(last.mode, "Idle");
    }

    #[tokio::test]
    async fn test_disabled_scenario_stays_at_zero() {
        let mut scenario = vertical(vec![
            Step::Set { value: 999.0 },
            Step::Wheel { delta: -3.0 },
            Step::Wait { seconds: 0.2 },
        ]);
        scenario.content = 80.0;
        let last = simulate(&scenario, &EngineConfig::default(), false, |_| {})
            .await
            .unwrap();
        assert_eq!(last.scroll, 0.0);
    }

    #[tokio::test]
    async fn test_horizontal_canvas_drag() {
        let scenario = Scenario {
            name: None,
            axis: ScenarioAxis::Horizontal,
            viewport: 200.0,
            content: 800.0,
            origin: 40.0,
            settle_limit: 1.0,
            steps: vec![
                Step::Set { value: 300.0 },
                Step::CanvasDragStart { position: 140.0 },
                Step::PointerMove { position: 90.0 },
                Step::Wait { seconds: 0.05 },
                Step::PointerUp,
            ],
        };
        let last = simulate(&scenario, &EngineConfig::default(), false, |_| {})
            .await
            .unwrap();
        assert_eq!(last.scroll, 350.0);
        assert_eq!(last.content_origin, 40.0 - 350.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_pacing_runs_every_frame() {
        let scenario = vertical(vec![
            Step::ScrollToBottom { duration: Some(0.1) },
            Step::Wait { seconds: 0.25 },
        ]);
        let mut frames = 0;
        let last = simulate(&scenario, &EngineConfig::default(), true, |_| frames += 1)
            .await
            .unwrap();
        assert_eq!(frames, 15);
        assert_eq!(last.scroll, 500.0);
        assert_eq!(last.completed, 1);
    }

    #[tokio::test]
    async fn test_vertical_origin_offsets_content() {
        let mut scenario = vertical(vec![Step::Set { value: 120.0 }, Step::Wait { seconds: 0.05 }]);
        scenario.origin = 70.0;
        let last = simulate(&scenario, &EngineConfig::default(), false, |_| {})
            .await
            .unwrap();
        assert_eq!(last.scroll, 120.0);
        assert_eq!(last.content_origin, 70.0 - 120.0);
    }

    #[tokio::test]
    async fn test_navigation_step_falls_back_to_configured_duration() {
        let scenario = vertical(vec![
            Step::ScrollToBottom { duration: None },
            Step::Wait { seconds: 0.5 },
        ]);
        let mut config = EngineConfig::default();
        config.vertical.default_duration = 1.0;

        let mut mid = None;
        let last = simulate(&scenario, &config, false, |record| {
            if record.frame == 30 {
                mid = Some((record.scroll, record.mode.clone()));
            }
        })
        .await
        .unwrap();

        let (scroll, mode) = mid.unwrap();
        assert!((scroll - 250.0).abs() < 1.0);
        assert_eq!(mode, "ClickAnimating");
        assert_eq!(last.scroll, 500.0);
        assert_eq!(last.completed, 1);
    }
}
