//! Notification transport infrastructure module
//!
//! Two mutually incompatible ways of reaching the desktop: a local helper
//! bridge over HTTP (macOS) and the freedesktop service on the session bus.

mod bus;
mod factory;
mod helper;
mod http;

pub use bus::{
    BusSettings, BusTransport, NotificationService, NotifyRequest, ZbusNotifications,
    NOTIFICATIONS_DESTINATION, NOTIFICATIONS_INTERFACE, NOTIFICATIONS_PATH,
};
pub use factory::{resolve_transport_kind, select_transport, transport_kind_for};
pub use helper::{HelperExit, HelperLocator, HelperProcess, HELPER_PACKAGE_PATH};
pub use http::{encode_component, HttpTransport};
