//! Renders outcome records into notification messages

use std::sync::Arc;

use crate::domain::message::{NotificationMessage, Severity};
use crate::domain::outcome::OutcomeRecord;

use super::ports::TimeFormatter;

/// Turns an outcome into a title/body/severity triple.
///
/// With a browser name the message describes that browser's run,
/// without one it describes the aggregate across all browsers.
#[derive(Clone)]
pub struct MessageFormatter {
    time: Arc<dyn TimeFormatter>,
}

impl MessageFormatter {
    pub fn new(time: Arc<dyn TimeFormatter>) -> Self {
        Self { time }
    }

    pub fn format(&self, record: &OutcomeRecord, browser: Option<&str>) -> NotificationMessage {
        let severity = Severity::classify(record);
        let skip_note = skip_note(record.skipped);

        let (title, body) = match (severity, browser) {
            (Severity::Error, Some(name)) => (format!("ERROR - {}", name), "Test error".to_string()),
            (Severity::Error, None) => ("TOTAL ERROR".to_string(), "Test error".to_string()),
            (Severity::Fail, Some(name)) => (
                format!("FAILED - {}", name),
                format!(
                    "{}/{} tests failed{} in {}.",
                    record.failed,
                    record.total,
                    skip_note,
                    self.time.format_interval(record.elapsed())
                ),
            ),
            (Severity::Fail, None) => (
                format!("TOTAL FAILED: {}", record.failed),
                format!(
                    "{}/{} tests failed{}.",
                    record.failed,
                    record.executed(),
                    skip_note
                ),
            ),
            (Severity::Pass, Some(name)) => (
                format!("PASSED - {}", name),
                format!(
                    "{} tests passed{} in {}.",
                    record.success,
                    skip_note,
                    self.time.format_interval(record.elapsed())
                ),
            ),
            (Severity::Pass, None) => (
                format!("TOTAL PASSED: {}", record.success),
                format!("{} tests passed{}.", record.success, skip_note),
            ),
        };

        NotificationMessage::new(title, body, severity)
    }
}

fn skip_note(skipped: u32) -> String {
    if skipped > 0 {
        format!(" ({} skipped)", skipped)
    } else {
        String::new()
    }
}

/// Whether a run-complete aggregate is worth a notification.
/// Single-browser runs already got their per-browser notification.
pub fn should_report_run(browser_count: usize, results: &OutcomeRecord) -> bool {
    browser_count > 1 && !results.disconnected
}
