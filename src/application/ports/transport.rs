//! Notification transport port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::message::NotificationMessage;
use crate::domain::outcome::{Browser, OutcomeRecord};
use crate::domain::platform::TransportKind;

/// Delivery errors. Never fatal to the host run; the reporter logs them.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Notification service not ready yet")]
    ServiceNotReady,

    #[error("Request to notification helper failed: {0}")]
    RequestFailed(String),

    #[error("Notification helper responded with HTTP {0}")]
    UnexpectedStatus(u16),

    #[error("Notify call failed: {0}")]
    RpcFailed(String),
}

/// Errors that abort plugin startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Notification helper not found. Searched: {}", display_paths(.searched))]
    HelperNotFound { searched: Vec<PathBuf> },

    #[error("Failed to start notification helper {path}: {message}")]
    HelperSpawn { path: String, message: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything a transport needs to deliver one notification
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message: NotificationMessage,
    /// The outcome the message was rendered from
    pub record: OutcomeRecord,
    /// Set for per-browser notifications, unset for run aggregates
    pub browser: Option<Browser>,
}

/// Port for delivering notifications to the desktop
#[async_trait]
pub trait Transport: Send + Sync {
    /// Which transport this is
    fn kind(&self) -> TransportKind;

    /// Deliver one notification.
    ///
    /// # Returns
    /// Ok(()) once the OS side accepted the notification, error otherwise
    async fn deliver(&self, delivery: &Delivery) -> Result<(), DeliveryError>;

    /// Release resources owned by the transport (helper processes).
    /// Called once when the host run ends.
    async fn shutdown(&self) {}
}

/// Blanket implementation for boxed transport types
#[async_trait]
impl Transport for Box<dyn Transport> {
    fn kind(&self) -> TransportKind {
        self.as_ref().kind()
    }

    async fn deliver(&self, delivery: &Delivery) -> Result<(), DeliveryError> {
        self.as_ref().deliver(delivery).await
    }

    async fn shutdown(&self) {
        self.as_ref().shutdown().await
    }
}
