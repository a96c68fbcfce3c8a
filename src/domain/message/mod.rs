//! Notification message domain module

mod notification;
mod severity;

pub use notification::NotificationMessage;
pub use severity::Severity;
