//! Domain layer - Core business logic
//!
//! Contains value objects and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod message;
pub mod outcome;
pub mod platform;

// Re-export common types
pub use config::{ParamValue, ReporterConfig, TransportConfig, TransportOverrides};
pub use error::*;
pub use message::{NotificationMessage, Severity};
pub use outcome::{Browser, Elapsed, OutcomeRecord};
pub use platform::{Platform, TransportKind};
