//! Session bus transport (freedesktop notifications over D-Bus)
//!
//! The service proxy is resolved in the background after startup. Until
//! it is ready, notifications are dropped rather than queued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use zbus::zvariant::Value;
use zbus::{Connection, Proxy};

use crate::application::ports::{Delivery, DeliveryError, Transport};
use crate::domain::config::ReporterConfig;
use crate::domain::outcome::Elapsed;
use crate::domain::platform::TransportKind;

pub const NOTIFICATIONS_DESTINATION: &str = "org.freedesktop.Notifications";
pub const NOTIFICATIONS_PATH: &str = "/org/freedesktop/Notifications";
pub const NOTIFICATIONS_INTERFACE: &str = "org.freedesktop.Notifications";

/// Arguments of one `Notify` call (actions and hints are always empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyRequest {
    pub app_name: String,
    /// Id of the notification to replace, 0 for a new one
    pub replaces_id: u32,
    pub icon: String,
    pub summary: String,
    pub body: String,
    pub expire_timeout_ms: i32,
}

/// The remote notification service
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Show a notification, returning the id the server assigned
    async fn notify(&self, request: &NotifyRequest) -> Result<u32, DeliveryError>;
}

/// `org.freedesktop.Notifications` reached through zbus
pub struct ZbusNotifications {
    proxy: Proxy<'static>,
}

impl ZbusNotifications {
    /// Connect to the session bus and wait until the service answers
    pub async fn connect() -> zbus::Result<Self> {
        let connection = Connection::session().await?;
        let proxy = Proxy::new(
            &connection,
            NOTIFICATIONS_DESTINATION,
            NOTIFICATIONS_PATH,
            NOTIFICATIONS_INTERFACE,
        )
        .await?;

        let (name, vendor, version, spec_version): (String, String, String, String) =
            proxy.call("GetServerInformation", &()).await?;
        debug!(%name, %vendor, %version, %spec_version, "Notification server found");

        Ok(Self { proxy })
    }
}

#[async_trait]
impl NotificationService for ZbusNotifications {
    async fn notify(&self, request: &NotifyRequest) -> Result<u32, DeliveryError> {
        let actions: Vec<&str> = Vec::new();
        let hints: HashMap<&str, Value<'_>> = HashMap::new();

        self.proxy
            .call(
                "Notify",
                &(
                    request.app_name.as_str(),
                    request.replaces_id,
                    request.icon.as_str(),
                    request.summary.as_str(),
                    request.body.as_str(),
                    actions,
                    hints,
                    request.expire_timeout_ms,
                ),
            )
            .await
            .map_err(|e| DeliveryError::RpcFailed(e.to_string()))
    }
}

/// Parameters fixed for every `Notify` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusSettings {
    pub app_name: String,
    /// Display-duration hint for the server, not an operation timeout
    pub expire_timeout: Elapsed,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            expire_timeout: Elapsed::default_expire_timeout(),
        }
    }
}

impl BusSettings {
    pub fn from_reporter_config(config: &ReporterConfig) -> Self {
        Self {
            app_name: config.bus_app_name_or_default().to_string(),
            expire_timeout: config.bus_expire_timeout_or_default(),
        }
    }

    fn expire_timeout_ms(&self) -> i32 {
        i32::try_from(self.expire_timeout.as_millis()).unwrap_or(i32::MAX)
    }
}

/// Notification transport over the session bus
pub struct BusTransport {
    service: Arc<OnceCell<Arc<dyn NotificationService>>>,
    last_id: AtomicU32,
    settings: BusSettings,
}

impl BusTransport {
    /// Create a transport with no service resolved yet
    pub fn new(settings: BusSettings) -> Self {
        Self {
            service: Arc::new(OnceCell::new()),
            last_id: AtomicU32::new(0),
            settings,
        }
    }

    /// Create the transport and resolve the session bus service in the
    /// background. Must be called from within a tokio runtime.
    pub fn connect(settings: BusSettings) -> Self {
        let transport = Self::new(settings);
        let cell = Arc::clone(&transport.service);

        tokio::spawn(async move {
            match ZbusNotifications::connect().await {
                Ok(service) => {
                    let service: Arc<dyn NotificationService> = Arc::new(service);
                    if cell.set(service).is_ok() {
                        info!("Notification service ready");
                    }
                }
                Err(e) => warn!("Notification service unavailable: {}", e),
            }
        });

        transport
    }

    /// Install a resolved service. Returns false if one was already set.
    pub fn resolve(&self, service: Arc<dyn NotificationService>) -> bool {
        self.service.set(service).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.service.initialized()
    }

    /// Id returned by the last successful `Notify`, 0 before any
    pub fn last_notification_id(&self) -> u32 {
        self.last_id.load(Ordering::SeqCst)
    }

    fn build_request(&self, delivery: &Delivery) -> NotifyRequest {
        let message = &delivery.message;
        NotifyRequest {
            app_name: self.settings.app_name.clone(),
            replaces_id: self.last_notification_id(),
            icon: message.severity.icon_name().to_string(),
            summary: message.title.clone(),
            body: message.body.clone(),
            expire_timeout_ms: self.settings.expire_timeout_ms(),
        }
    }
}

#[async_trait]
impl Transport for BusTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Bus
    }

    async fn deliver(&self, delivery: &Delivery) -> Result<(), DeliveryError> {
        let Some(service) = self.service.get() else {
            return Err(DeliveryError::ServiceNotReady);
        };

        let request = self.build_request(delivery);
        let id = service.notify(&request).await?;
        debug!(id, replaced = request.replaces_id, "Notification shown");
        self.last_id.store(id, Ordering::SeqCst);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::BusConfig;
    use crate::domain::message::{NotificationMessage, Severity};
    use crate::domain::outcome::OutcomeRecord;
    use std::sync::Mutex;

    /// Records calls and hands out ids 7, 8, 9, ...
    #[derive(Default)]
    struct MockService {
        requests: Mutex<Vec<NotifyRequest>>,
    }

    #[async_trait]
    impl NotificationService for MockService {
        async fn notify(&self, request: &NotifyRequest) -> Result<u32, DeliveryError> {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            Ok(6 + requests.len() as u32)
        }
    }

    struct BrokenService;

    #[async_trait]
    impl NotificationService for BrokenService {
        async fn notify(&self, _request: &NotifyRequest) -> Result<u32, DeliveryError> {
            Err(DeliveryError::RpcFailed("org.freedesktop.DBus.Error.NoReply".to_string()))
        }
    }

    fn delivery(title: &str, severity: Severity) -> Delivery {
        Delivery {
            message: NotificationMessage::new(title, "body", severity),
            record: OutcomeRecord::default(),
            browser: None,
        }
    }

    #[tokio::test]
    async fn not_ready_drops_without_calls() {
        let transport = BusTransport::new(BusSettings::default());
        assert!(!transport.is_ready());

        let result = transport.deliver(&delivery("PASSED - Chrome", Severity::Pass)).await;
        assert!(matches!(result, Err(DeliveryError::ServiceNotReady)));

        // Resolving later does not replay the dropped message
        let service = Arc::new(MockService::default());
        assert!(transport.resolve(service.clone()));
        assert!(service.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_call_per_send_with_previous_id() {
        let transport = BusTransport::new(BusSettings::default());
        let service = Arc::new(MockService::default());
        transport.resolve(service.clone());

        transport.deliver(&delivery("PASSED - Chrome", Severity::Pass)).await.unwrap();
        assert_eq!(transport.last_notification_id(), 7);

        transport.deliver(&delivery("FAILED - Chrome", Severity::Fail)).await.unwrap();
        assert_eq!(transport.last_notification_id(), 8);

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].replaces_id, 0);
        assert_eq!(requests[1].replaces_id, 7);
    }

    #[tokio::test]
    async fn request_carries_icon_title_body_and_timeout() {
        let transport = BusTransport::new(BusSettings::default());
        let service = Arc::new(MockService::default());
        transport.resolve(service.clone());

        transport.deliver(&delivery("ERROR - Chrome", Severity::Error)).await.unwrap();

        let requests = service.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            NotifyRequest {
                app_name: String::new(),
                replaces_id: 0,
                icon: "face-crying".to_string(),
                summary: "ERROR - Chrome".to_string(),
                body: "body".to_string(),
                expire_timeout_ms: 5000,
            }
        );
    }

    #[tokio::test]
    async fn failed_call_keeps_previous_id() {
        let transport = BusTransport::new(BusSettings::default());
        transport.last_id.store(3, Ordering::SeqCst);
        transport.resolve(Arc::new(BrokenService));

        let result = transport.deliver(&delivery("PASSED - Chrome", Severity::Pass)).await;
        assert!(matches!(result, Err(DeliveryError::RpcFailed(_))));
        assert_eq!(transport.last_notification_id(), 3);
    }

    #[test]
    fn resolve_only_once() {
        let transport = BusTransport::new(BusSettings::default());
        assert!(transport.resolve(Arc::new(MockService::default())));
        assert!(!transport.resolve(Arc::new(MockService::default())));
        assert!(transport.is_ready());
    }

    #[test]
    fn settings_from_config() {
        let config = ReporterConfig {
            bus: Some(BusConfig {
                app_name: Some("karma".to_string()),
                expire_timeout: Some("10s".to_string()),
            }),
            ..Default::default()
        };

        let settings = BusSettings::from_reporter_config(&config);
        assert_eq!(settings.app_name, "karma");
        assert_eq!(settings.expire_timeout_ms(), 10_000);
    }
}
