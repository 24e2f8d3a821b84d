//! Scripted input for the simulator
//!
//! A scenario fixes the extents of one scroll axis and lists the input steps
//! fed to it. Files are TOML unless they end in `.json`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use scrollkit_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioAxis {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub axis: ScenarioAxis,
    /// Visible extent along the axis
    pub viewport: f64,
    /// Content extent along the axis
    pub content: f64,
    /// Screen-space origin of the container along the axis
    #[serde(default)]
    pub origin: f64,
    /// Seconds to keep ticking after the last step while motion continues
    #[serde(default = "default_settle_limit")]
    pub settle_limit: f64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One scripted input. Everything except `wait` happens between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Wheel {
        delta: f64,
    },
    Animate {
        target: f64,
        duration: f64,
        #[serde(default)]
        delay: f64,
    },
    Set {
        value: f64,
    },
    /// Press on the scrollbar track (grip drag or track click)
    PointerDown {
        position: f64,
    },
    /// Press on the content canvas, screen space (horizontal only)
    CanvasDragStart {
        position: f64,
    },
    PointerMove {
        position: f64,
    },
    PointerUp,
    Hover {
        hovered: bool,
    },
    Configure {
        viewport: f64,
        content: f64,
    },
    /// Without a duration the axis' configured default is used
    ScrollToTop {
        #[serde(default)]
        duration: Option<f64>,
    },
    ScrollToBottom {
        #[serde(default)]
        duration: Option<f64>,
    },
    /// Run frames for `seconds`
    Wait {
        seconds: f64,
    },
}

fn default_settle_limit() -> f64 {
    5.0
}

impl Scenario {
    /// Load a scenario, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let scenario = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        extent("viewport", self.viewport).map_err(Error::Scenario)?;
        extent("content", self.content).map_err(Error::Scenario)?;
        extent("settle_limit", self.settle_limit).map_err(Error::Scenario)?;
        if !self.origin.is_finite() {
            return Err(Error::Scenario("origin must be finite".to_string()));
        }

        for (idx, step) in self.steps.iter().enumerate() {
            let checked = match step {
                Step::Wait { seconds } => extent("wait.seconds", *seconds),
                Step::Configure { viewport, content } => extent("configure.viewport", *viewport)
                    .and_then(|_| extent("configure.content", *content)),
                Step::ScrollToTop {
                    duration: Some(duration),
                }
                | Step::ScrollToBottom {
                    duration: Some(duration),
                } => extent("duration", *duration),
                Step::CanvasDragStart { .. } if self.axis == ScenarioAxis::Vertical => {
                    Err("canvas_drag_start requires a horizontal scenario".to_string())
                }
                // Non-finite input is left in on purpose: the engine must shrug it off
                _ => Ok(()),
            };
            checked.map_err(|e| Error::Scenario(format!("step {}: {}", idx + 1, e)))?;
        }
        Ok(())
    }

    /// Display name, falling back to the axis
    pub fn title(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{:?} scenario", self.axis).to_lowercase())
    }
}

fn extent(field: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!(
            "{} must be a non-negative finite number, got {}",
            field, value
        ))
    }
}
