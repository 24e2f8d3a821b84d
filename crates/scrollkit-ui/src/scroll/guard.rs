//! L4 Atomic Layer: Non-finite input filtering
//!
//! Host input layers occasionally hand over NaN or infinite positions. Such a
//! value is dropped and reported once per owner so a glitching device cannot
//! flood the log every frame.

use tracing::warn;

#[derive(Debug, Default, Clone)]
pub struct FiniteGuard {
    reported: bool,
}

impl FiniteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when every value is finite; otherwise logs (once) and returns false
    pub fn check(&mut self, operation: &'static str, values: &[f64]) -> bool {
        if values.iter().all(|v| v.is_finite()) {
            return true;
        }
        if !self.reported {
            self.reported = true;
            warn!(
                operation,
                values = ?values,
                "Ignoring non-finite scroll input (further occurrences are not logged)"
            );
        }
        false
    }
}
