//! testrun-notifier - desktop notifications for test runner results
//!
//! Turns per-browser and per-run test outcomes into short desktop
//! notifications and delivers them through whatever the platform offers.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Outcome records, messages, platform and config value objects
//! - **Application**: Message formatting, the reporter use case, and port traits
//! - **Infrastructure**: Transports (helper bridge over HTTP, session bus),
//!   config file store, and the default time formatter
//! - **Plugin**: Bootstrap that wires configuration, platform and transport
//!
//! # Example
//!
//! ```no_run
//! use testrun_notifier::{Browser, NotificationPlugin, OutcomeRecord};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let reporter = NotificationPlugin::builder().start().await?;
//!
//! let chrome = Browser::new("Chrome", OutcomeRecord {
//!     success: 8,
//!     total: 8,
//!     total_time: 1200,
//!     ..Default::default()
//! });
//! reporter.on_browser_complete(&chrome).await?;
//! reporter.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod plugin;

pub use application::NotificationReporter;
pub use domain::{Browser, Elapsed, OutcomeRecord, Platform, TransportKind};
pub use logging::init_logging;
pub use plugin::{NotificationPlugin, PluginBuilder};
