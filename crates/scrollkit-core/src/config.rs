use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Vertical scroll driver tuning
    #[serde(default = "ScrollConfig::vertical", deserialize_with = "vertical_section")]
    pub vertical: ScrollConfig,
    /// Horizontal scroll driver tuning
    #[serde(default = "ScrollConfig::horizontal", deserialize_with = "horizontal_section")]
    pub horizontal: ScrollConfig,
    #[serde(default)]
    pub scrollbar: ScrollbarConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            vertical: ScrollConfig::vertical(),
            horizontal: ScrollConfig::horizontal(),
            scrollbar: ScrollbarConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Frames per second used by the simulator
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            frame_rate: default_frame_rate(),
        }
    }
}

/// Easing curve applied to click/programmatic scroll animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the target when the animation ends
    None,
    /// Constant speed
    #[default]
    Linear,
    /// Cubic ease-out
    Cubic,
    /// Quintic ease-out
    Quintic,
    /// Exponential ease-out
    EaseOut,
}

/// Tuning for one scroll axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Velocity added per wheel notch
    pub wheel_force: f64,
    /// Momentum decay rate per second
    pub smooth_speed: f64,
    /// Momentum below this magnitude stops
    pub velocity_threshold: f64,
    /// Easing for click animations
    pub easing: EasingType,
    /// Duration (seconds) used by navigation helpers when none is given
    pub default_duration: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self::vertical()
    }
}

impl ScrollConfig {
    pub fn vertical() -> Self {
        Self {
            wheel_force: 12.0,
            smooth_speed: 10.0,
            velocity_threshold: 0.1,
            easing: EasingType::Linear,
            default_duration: 0.25,
        }
    }

    pub fn horizontal() -> Self {
        Self {
            wheel_force: 16.0,
            smooth_speed: 8.0,
            velocity_threshold: 0.1,
            easing: EasingType::Linear,
            default_duration: 0.3,
        }
    }

    fn validate(&self, section: &str) -> crate::Result<()> {
        positive(section, "wheel_force", self.wheel_force)?;
        positive(section, "smooth_speed", self.smooth_speed)?;
        positive(section, "velocity_threshold", self.velocity_threshold)?;
        non_negative(section, "default_duration", self.default_duration)?;
        Ok(())
    }
}

/// Partially specified axis section; missing fields fall back to the axis defaults
#[derive(Debug, Default, Deserialize)]
struct ScrollConfigOverrides {
    wheel_force: Option<f64>,
    smooth_speed: Option<f64>,
    velocity_threshold: Option<f64>,
    easing: Option<EasingType>,
    default_duration: Option<f64>,
}

impl ScrollConfigOverrides {
    fn apply_to(self, base: ScrollConfig) -> ScrollConfig {
        ScrollConfig {
            wheel_force: self.wheel_force.unwrap_or(base.wheel_force),
            smooth_speed: self.smooth_speed.unwrap_or(base.smooth_speed),
            velocity_threshold: self.velocity_threshold.unwrap_or(base.velocity_threshold),
            easing: self.easing.unwrap_or(base.easing),
            default_duration: self.default_duration.unwrap_or(base.default_duration),
        }
    }
}

fn vertical_section<'de, D>(deserializer: D) -> Result<ScrollConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ScrollConfigOverrides::deserialize(deserializer)?.apply_to(ScrollConfig::vertical()))
}

fn horizontal_section<'de, D>(deserializer: D) -> Result<ScrollConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ScrollConfigOverrides::deserialize(deserializer)?.apply_to(ScrollConfig::horizontal()))
}

/// Edge of the container the scrollbar is docked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarDock {
    /// Right edge (vertical) or bottom edge (horizontal)
    #[default]
    Trailing,
    /// Left edge (vertical) or top edge (horizontal)
    Leading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollbarConfig {
    /// Bar thickness in pixels
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    /// Grip never gets shorter than this
    #[serde(default = "default_min_grip_size")]
    pub min_grip_size: f64,
    /// Track click glide duration for a very short distance (seconds)
    #[serde(default = "default_click_min_duration")]
    pub click_min_duration: f64,
    /// Track click glide duration for a full-length jump (seconds)
    #[serde(default = "default_click_max_duration")]
    pub click_max_duration: f64,
    /// Hover fade rate per second
    #[serde(default = "default_fade_speed")]
    pub fade_speed: f64,
    #[serde(default = "default_idle_alpha")]
    pub idle_alpha: f64,
    #[serde(default = "default_hover_alpha")]
    pub hover_alpha: f64,
    #[serde(default = "default_press_alpha")]
    pub press_alpha: f64,
    #[serde(default)]
    pub dock: BarDock,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            min_grip_size: default_min_grip_size(),
            click_min_duration: default_click_min_duration(),
            click_max_duration: default_click_max_duration(),
            fade_speed: default_fade_speed(),
            idle_alpha: default_idle_alpha(),
            hover_alpha: default_hover_alpha(),
            press_alpha: default_press_alpha(),
            dock: BarDock::default(),
        }
    }
}

impl ScrollbarConfig {
    fn validate(&self) -> crate::Result<()> {
        non_negative("scrollbar", "bar_width", self.bar_width)?;
        non_negative("scrollbar", "min_grip_size", self.min_grip_size)?;
        non_negative("scrollbar", "click_min_duration", self.click_min_duration)?;
        non_negative("scrollbar", "click_max_duration", self.click_max_duration)?;
        positive("scrollbar", "fade_speed", self.fade_speed)?;
        if self.click_min_duration > self.click_max_duration {
            return Err(crate::Error::Config(format!(
                "scrollbar.click_min_duration ({}) exceeds click_max_duration ({})",
                self.click_min_duration, self.click_max_duration
            )));
        }
        for (name, alpha) in [
            ("idle_alpha", self.idle_alpha),
            ("hover_alpha", self.hover_alpha),
            ("press_alpha", self.press_alpha),
        ] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(crate::Error::Config(format!(
                    "scrollbar.{} must be within [0, 1], got {}",
                    name, alpha
                )));
            }
        }
        Ok(())
    }
}

fn positive(section: &str, field: &str, value: f64) -> crate::Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(crate::Error::Config(format!(
            "{}.{} must be a positive finite number, got {}",
            section, field, value
        )))
    }
}

fn non_negative(section: &str, field: &str, value: f64) -> crate::Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(crate::Error::Config(format!(
            "{}.{} must be a non-negative finite number, got {}",
            section, field, value
        )))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_rate() -> u32 {
    60
}

fn default_bar_width() -> f64 {
    8.0
}

fn default_min_grip_size() -> f64 {
    20.0
}

fn default_click_min_duration() -> f64 {
    0.15
}

fn default_click_max_duration() -> f64 {
    0.5
}

fn default_fade_speed() -> f64 {
    8.0
}

fn default_idle_alpha() -> f64 {
    0.4
}

fn default_hover_alpha() -> f64 {
    0.8
}

fn default_press_alpha() -> f64 {
    1.0
}

impl EngineConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Check every tunable for values the engine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.general.frame_rate == 0 {
            return Err(crate::Error::Config(
                "general.frame_rate must be greater than zero".to_string(),
            ));
        }
        self.vertical.validate("vertical")?;
        self.horizontal.validate("horizontal")?;
        self.scrollbar.validate()
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollkit/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollkit")
            .join("config.toml")
    }
}
