//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the helper bridge, the session bus, and config files.

pub mod config;
pub mod time;
pub mod transport;

// Re-export adapters
pub use config::XdgConfigStore;
pub use time::IntervalFormatter;
pub use transport::{select_transport, BusTransport, HttpTransport};
