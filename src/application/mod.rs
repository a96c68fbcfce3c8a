//! Application layer - Use cases and port interfaces
//!
//! Contains the message formatter, the reporter use case, and trait
//! definitions for external system interactions.

pub mod formatter;
pub mod ports;
pub mod reporter;

// Re-export use cases
pub use formatter::{should_report_run, MessageFormatter};
pub use reporter::NotificationReporter;
