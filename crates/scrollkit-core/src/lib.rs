pub mod config;
pub mod error;

pub use config::{BarDock, EasingType, EngineConfig, GeneralConfig, ScrollConfig, ScrollbarConfig};
pub use error::{Error, Result};
