//! Notification reporter use case
//!
//! Receives the host's lifecycle callbacks, renders messages and hands
//! them to the selected transport. Delivery is best-effort: callbacks
//! return immediately and the outcome is only logged.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::outcome::{Browser, OutcomeRecord};

use super::formatter::{should_report_run, MessageFormatter};
use super::ports::{Delivery, DeliveryError, Transport};

/// Host-facing reporter bound to one transport for its whole lifetime
pub struct NotificationReporter {
    transport: Arc<dyn Transport>,
    formatter: MessageFormatter,
}

impl NotificationReporter {
    /// Create a new reporter
    pub fn new(transport: Arc<dyn Transport>, formatter: MessageFormatter) -> Self {
        Self {
            transport,
            formatter,
        }
    }

    /// The transport this reporter delivers through
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// A browser finished its run.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_browser_complete(&self, browser: &Browser) -> JoinHandle<()> {
        let record = &browser.last_result;
        debug!(browser = %browser.name, ?record, "Browser complete");

        let message = self.formatter.format(record, Some(&browser.name));
        self.dispatch(Delivery {
            message,
            record: record.clone(),
            browser: Some(browser.clone()),
        })
    }

    /// The whole run finished.
    ///
    /// Returns `None` when the aggregate is suppressed (single browser or
    /// disconnected run). Must be called from within a tokio runtime.
    pub fn on_run_complete(
        &self,
        browsers: &[Browser],
        results: &OutcomeRecord,
    ) -> Option<JoinHandle<()>> {
        if !should_report_run(browsers.len(), results) {
            debug!(
                browsers = browsers.len(),
                disconnected = results.disconnected,
                "Skipping run summary"
            );
            return None;
        }

        let message = self.formatter.format(results, None);
        Some(self.dispatch(Delivery {
            message,
            record: results.clone(),
            browser: None,
        }))
    }

    /// The host is exiting; stop anything the transport owns
    pub async fn shutdown(&self) {
        debug!(transport = %self.transport.kind(), "Shutting down notification transport");
        self.transport.shutdown().await;
    }

    fn dispatch(&self, delivery: Delivery) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);

        tokio::spawn(async move {
            let kind = transport.kind();
            match transport.deliver(&delivery).await {
                Ok(()) => {
                    debug!(transport = %kind, title = %delivery.message.title, "Notification delivered")
                }
                Err(DeliveryError::ServiceNotReady) => {
                    info!(transport = %kind, "{}", DeliveryError::ServiceNotReady)
                }
                Err(e) => error!(transport = %kind, "error: {}", e),
            }
        })
    }
}
