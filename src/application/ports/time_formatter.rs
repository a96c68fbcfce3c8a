//! Time formatting port interface

use crate::domain::outcome::Elapsed;

/// Port for rendering elapsed run time in notification bodies
pub trait TimeFormatter: Send + Sync {
    /// Format an interval for humans, e.g. "1.2s"
    fn format_interval(&self, elapsed: Elapsed) -> String;
}

impl<F> TimeFormatter for F
where
    F: Fn(Elapsed) -> String + Send + Sync,
{
    fn format_interval(&self, elapsed: Elapsed) -> String {
        self(elapsed)
    }
}
