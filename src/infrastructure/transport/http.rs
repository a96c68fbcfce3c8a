//! Helper bridge transport
//!
//! Sends each notification as a plain HTTP GET to a local helper process
//! that forwards it to the macOS Notification Center:
//! `GET /{pass|fail}?title=..&message=..[&key=value..]`

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ports::{Delivery, DeliveryError, StartupError, Transport};
use crate::domain::config::TransportConfig;
use crate::domain::platform::TransportKind;

use super::helper::{HelperExit, HelperLocator, HelperProcess};

/// Characters escaped in query components: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, matching JavaScript's encodeURIComponent
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode one query component
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Notification transport talking to the local helper bridge
pub struct HttpTransport {
    config: TransportConfig,
    client: reqwest::Client,
    helper: Mutex<Option<HelperProcess>>,
}

impl HttpTransport {
    /// Create a transport for an already running helper
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            helper: Mutex::new(None),
        }
    }

    /// Locate and spawn the helper, then create the transport
    pub fn start(config: TransportConfig, locator: &HelperLocator) -> Result<Self, StartupError> {
        let path = locator.locate()?;
        let helper = HelperProcess::spawn(&path, &config.host, config.port)?;

        Ok(Self {
            config,
            client: reqwest::Client::new(),
            helper: Mutex::new(Some(helper)),
        })
    }

    /// Build the request path and query for a delivery
    pub fn request_path(&self, delivery: &Delivery) -> String {
        let message = &delivery.message;
        let mut path = format!(
            "/{}?title={}&message={}",
            message.severity.route(),
            encode_component(&message.title),
            encode_component(&message.body)
        );

        for (key, value) in self
            .config
            .query_params(&delivery.record, delivery.browser.as_ref())
        {
            path.push('&');
            path.push_str(&encode_component(key));
            path.push('=');
            path.push_str(&encode_component(&value));
        }

        path
    }

    /// Full request URL for a delivery
    fn request_url(&self, delivery: &Delivery) -> String {
        format!("{}{}", self.config.base_url(), self.request_path(delivery))
    }

    /// Stop the helper process, if this transport started one
    pub async fn stop_helper(&self) -> Option<HelperExit> {
        let helper = self.helper.lock().await.take()?;
        helper.shutdown().await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn deliver(&self, delivery: &Delivery) -> Result<(), DeliveryError> {
        let url = self.request_url(delivery);
        debug!(%url, "Sending notification to helper");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DeliveryError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::UnexpectedStatus(status.as_u16()));
        }

        Ok(())
    }

    async fn shutdown(&self) {
        self.stop_helper().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{ParamValue, TransportOverrides};
    use crate::domain::message::{NotificationMessage, Severity};
    use crate::domain::outcome::{Browser, OutcomeRecord};

    fn delivery(title: &str, body: &str, severity: Severity) -> Delivery {
        Delivery {
            message: NotificationMessage::new(title, body, severity),
            record: OutcomeRecord::default(),
            browser: None,
        }
    }

    #[test]
    fn encode_component_matches_uri_component_rules() {
        assert_eq!(encode_component("PASSED - Chrome"), "PASSED%20-%20Chrome");
        assert_eq!(encode_component("2/10 tests"), "2%2F10%20tests");
        assert_eq!(encode_component("a&b=c?"), "a%26b%3Dc%3F");
        assert_eq!(encode_component("(3 skipped)!*'~_."), "(3%20skipped)!*'~_.");
        assert_eq!(encode_component("ü"), "%C3%BC");
    }

    #[test]
    fn pass_request_path() {
        let transport = HttpTransport::new(TransportConfig::default());
        let path = transport.request_path(&delivery(
            "PASSED - Chrome",
            "8 tests passed (2 skipped) in 1.2s.",
            Severity::Pass,
        ));

        assert!(path.starts_with("/pass?title=PASSED%20-%20Chrome&message="));
        assert_eq!(
            path,
            "/pass?title=PASSED%20-%20Chrome&message=8%20tests%20passed%20(2%20skipped)%20in%201.2s."
        );
    }

    #[test]
    fn fail_and_error_use_fail_route() {
        let transport = HttpTransport::new(TransportConfig::default());

        let fail = transport.request_path(&delivery("FAILED - Firefox", "x", Severity::Fail));
        assert!(fail.starts_with("/fail?title=FAILED%20-%20Firefox"));

        let error = transport.request_path(&delivery("ERROR - Firefox", "Test error", Severity::Error));
        assert!(error.starts_with("/fail?title=ERROR%20-%20Firefox&message=Test%20error"));
    }

    #[test]
    fn extra_params_follow_message() {
        let config = TransportConfig::default().with_overrides(
            TransportOverrides::new()
                .param("sound", "Glass")
                .param(
                    "subtitle",
                    ParamValue::computed(|record, browser| {
                        format!(
                            "{} ({})",
                            browser.map(|b| b.name.as_str()).unwrap_or("all"),
                            record.total
                        )
                    }),
                )
                .param("port", "80"),
        );
        let transport = HttpTransport::new(config);

        let record = OutcomeRecord {
            success: 3,
            total: 3,
            ..Default::default()
        };
        let delivery = Delivery {
            message: NotificationMessage::new("PASSED - Chrome", "ok", Severity::Pass),
            record: record.clone(),
            browser: Some(Browser::new("Chrome", record)),
        };

        assert_eq!(
            transport.request_path(&delivery),
            "/pass?title=PASSED%20-%20Chrome&message=ok&sound=Glass&subtitle=Chrome%20(3)"
        );
    }

    #[test]
    fn param_keys_are_encoded() {
        let config = TransportConfig::default()
            .with_overrides(TransportOverrides::new().param("a&b=c d", "x y"));
        let transport = HttpTransport::new(config);

        assert_eq!(
            transport.request_path(&delivery("t", "m", Severity::Pass)),
            "/pass?title=t&message=m&a%26b%3Dc%20d=x%20y"
        );
    }

    #[test]
    fn request_url_uses_configured_host_and_port() {
        let config = TransportConfig::default()
            .with_overrides(TransportOverrides::new().host("127.0.0.1").port(4000));
        let transport = HttpTransport::new(config);

        let url = transport.request_url(&delivery("t", "m", Severity::Pass));
        assert_eq!(url, "http://127.0.0.1:4000/pass?title=t&message=m");
    }

    #[tokio::test]
    async fn stop_helper_without_helper_is_none() {
        let transport = HttpTransport::new(TransportConfig::default());
        assert!(transport.stop_helper().await.is_none());
    }

    #[test]
    fn start_fails_without_helper() {
        let dir = tempfile::tempdir().unwrap();
        let result = HttpTransport::start(TransportConfig::default(), &HelperLocator::new(dir.path()));
        assert!(matches!(result, Err(StartupError::HelperNotFound { .. })));
    }
}
