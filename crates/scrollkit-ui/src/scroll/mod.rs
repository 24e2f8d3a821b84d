//! Smooth scrolling engine
//!
//! Reconciles wheel momentum, click/programmatic tweening and drag into a
//! single authoritative scroll value per axis.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (cubic, quintic, exponential)
//! - `timing` - Time calculation utilities (progress, interpolation, clamping)
//! - `config` - Configuration types (re-exported from scrollkit-core) and momentum math
//! - `guard` - Non-finite input filtering
//!
//! ## L3 Molecular Layer
//! - `animation` - Click animation records and request builder
//!
//! ## L2 Organism Layer
//! - `driver` - The per-axis state machine
//!
//! # Usage
//!
//! ```ignore
//! use scrollkit_ui::scroll::{AnimationRequest, ScrollDriver};
//!
//! let mut driver = ScrollDriver::vertical();
//! driver.configure(viewport_height, content_height);
//!
//! driver.wheel(-1.0);
//! driver.animate(AnimationRequest::new(500.0, 0.4).on_complete(|| println!("done")));
//!
//! // Once per frame
//! if let Some(offset) = driver.advance(dt) {
//!     canvas.set_y(offset);
//! }
//! ```

// L4 Atomic Layer
pub mod config;
pub mod easing;
pub mod guard;
pub mod timing;

// L3 Molecular Layer
pub mod animation;

// L2 Organism Layer
pub mod driver;

// Re-exports for convenient access
pub use animation::{AnimationRequest, CompletionCallback};
pub use config::{ScrollConfig, ScrollConfigExt, ScrollbarConfig};
pub use driver::{Axis, ScrollDriver, ScrollMode};
pub use easing::{EasingType, EasingTypeExt};
pub use guard::FiniteGuard;
