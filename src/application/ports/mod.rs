//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod time_formatter;
pub mod transport;

// Re-export common types
pub use config::ConfigStore;
pub use time_formatter::TimeFormatter;
pub use transport::{Delivery, DeliveryError, StartupError, Transport};
