//! Default interval formatter

use crate::application::ports::TimeFormatter;
use crate::domain::outcome::Elapsed;

/// Formats intervals with tenth-of-a-second precision ("1.2s", "2m 5.0s")
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalFormatter;

impl IntervalFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl TimeFormatter for IntervalFormatter {
    fn format_interval(&self, elapsed: Elapsed) -> String {
        elapsed.to_string()
    }
}
