//! Rendered notification message

use super::severity::Severity;

/// A title/body pair ready for delivery, tagged with its severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl NotificationMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity,
        }
    }
}
