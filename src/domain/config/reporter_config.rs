//! Reporter configuration value object

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::outcome::{Elapsed, DEFAULT_EXPIRE_TIMEOUT_SECS};
use crate::domain::platform::TransportKind;

/// Default host the helper bridge listens on
pub const DEFAULT_HTTP_HOST: &str = "localhost";

/// Default port the helper bridge listens on
pub const DEFAULT_HTTP_PORT: u16 = 1337;

/// Helper bridge (HTTP transport) configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Explicit helper executable; skips the install-root search
    pub helper_path: Option<PathBuf>,
    /// Directory the install-layout search starts from
    pub install_root: Option<PathBuf>,
    /// Extra query parameters appended to every request
    pub params: Option<BTreeMap<String, String>>,
}

/// Session bus transport configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    pub app_name: Option<String>,
    pub expire_timeout: Option<String>,
}

/// Reporter configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Force a transport instead of choosing by platform
    pub transport: Option<String>,
    pub http: Option<HttpConfig>,
    pub bus: Option<BusConfig>,
}

impl ReporterConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            transport: None,
            http: Some(HttpConfig {
                host: Some(DEFAULT_HTTP_HOST.to_string()),
                port: Some(DEFAULT_HTTP_PORT),
                helper_path: None,
                install_root: None,
                params: None,
            }),
            bus: Some(BusConfig {
                app_name: Some(String::new()),
                expire_timeout: Some(format!("{}s", DEFAULT_EXPIRE_TIMEOUT_SECS)),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            transport: other.transport.or(self.transport),
            http: Self::merge_http_config(self.http, other.http),
            bus: Self::merge_bus_config(self.bus, other.bus),
        }
    }

    fn merge_http_config(base: Option<HttpConfig>, other: Option<HttpConfig>) -> Option<HttpConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(HttpConfig {
                host: o.host.or(b.host),
                port: o.port.or(b.port),
                helper_path: o.helper_path.or(b.helper_path),
                install_root: o.install_root.or(b.install_root),
                params: match (b.params, o.params) {
                    (Some(mut base_params), Some(other_params)) => {
                        base_params.extend(other_params);
                        Some(base_params)
                    }
                    (b, o) => o.or(b),
                },
            }),
        }
    }

    fn merge_bus_config(base: Option<BusConfig>, other: Option<BusConfig>) -> Option<BusConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(BusConfig {
                app_name: o.app_name.or(b.app_name),
                expire_timeout: o.expire_timeout.or(b.expire_timeout),
            }),
        }
    }

    /// Get the forced transport, if set and valid
    pub fn transport_kind(&self) -> Option<TransportKind> {
        self.transport.as_ref().and_then(|s| s.parse().ok())
    }

    /// Get the helper host, or "localhost" if not set
    pub fn http_host_or_default(&self) -> &str {
        self.http
            .as_ref()
            .and_then(|h| h.host.as_deref())
            .unwrap_or(DEFAULT_HTTP_HOST)
    }

    /// Get the helper port, or 1337 if not set
    pub fn http_port_or_default(&self) -> u16 {
        self.http
            .as_ref()
            .and_then(|h| h.port)
            .unwrap_or(DEFAULT_HTTP_PORT)
    }

    pub fn helper_path(&self) -> Option<&PathBuf> {
        self.http.as_ref().and_then(|h| h.helper_path.as_ref())
    }

    pub fn install_root(&self) -> Option<&PathBuf> {
        self.http.as_ref().and_then(|h| h.install_root.as_ref())
    }

    /// Static query parameters from the config file
    pub fn http_params(&self) -> BTreeMap<String, String> {
        self.http
            .as_ref()
            .and_then(|h| h.params.clone())
            .unwrap_or_default()
    }

    /// Get the bus application name, or "" if not set
    pub fn bus_app_name_or_default(&self) -> &str {
        self.bus
            .as_ref()
            .and_then(|b| b.app_name.as_deref())
            .unwrap_or("")
    }

    /// Get the bus expire timeout, or 5s if not set/invalid
    pub fn bus_expire_timeout_or_default(&self) -> Elapsed {
        self.bus
            .as_ref()
            .and_then(|b| b.expire_timeout.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Elapsed::default_expire_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = ReporterConfig::defaults();
        assert!(config.transport.is_none());
        assert_eq!(config.http_host_or_default(), "localhost");
        assert_eq!(config.http_port_or_default(), 1337);
        assert!(config.helper_path().is_none());
        assert_eq!(config.bus_app_name_or_default(), "");
        assert_eq!(config.bus_expire_timeout_or_default().as_millis(), 5000);
    }

    #[test]
    fn defaults_expire_timeout_parses() {
        let config = ReporterConfig::defaults();
        let raw = config.bus.as_ref().unwrap().expire_timeout.clone().unwrap();
        assert_eq!(raw.parse::<Elapsed>().unwrap().as_millis(), 5000);
    }

    #[test]
    fn oversized_expire_timeout_falls_back_to_default() {
        let config = ReporterConfig {
            bus: Some(BusConfig {
                app_name: None,
                expire_timeout: Some("307445734561825861m".to_string()),
            }),
            ..Default::default()
        };
        assert_eq!(config.bus_expire_timeout_or_default().as_millis(), 5000);
    }

    #[test]
    fn empty_has_all_none() {
        let config = ReporterConfig::empty();
        assert!(config.transport.is_none());
        assert!(config.http.is_none());
        assert!(config.bus.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = ReporterConfig::defaults();
        let other = ReporterConfig {
            transport: Some("http".to_string()),
            http: Some(HttpConfig {
                port: Some(9000),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.transport_kind(), Some(TransportKind::Http));
        assert_eq!(merged.http_port_or_default(), 9000);
        assert_eq!(merged.http_host_or_default(), "localhost"); // Kept from base
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = ReporterConfig {
            bus: Some(BusConfig {
                app_name: Some("karma".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(ReporterConfig::empty());
        assert_eq!(merged.bus_app_name_or_default(), "karma");
    }

    #[test]
    fn merge_params_later_keys_win() {
        let base = ReporterConfig {
            http: Some(HttpConfig {
                params: Some(BTreeMap::from([
                    ("sound".to_string(), "Glass".to_string()),
                    ("group".to_string(), "tests".to_string()),
                ])),
                ..Default::default()
            }),
            ..Default::default()
        };
        let other = ReporterConfig {
            http: Some(HttpConfig {
                params: Some(BTreeMap::from([("sound".to_string(), "Basso".to_string())])),
                ..Default::default()
            }),
            ..Default::default()
        };

        let params = base.merge(other).http_params();
        assert_eq!(params.get("sound").map(String::as_str), Some("Basso"));
        assert_eq!(params.get("group").map(String::as_str), Some("tests"));
    }

    #[test]
    fn invalid_transport_is_ignored() {
        let config = ReporterConfig {
            transport: Some("carrier-pigeon".to_string()),
            ..Default::default()
        };
        assert!(config.transport_kind().is_none());
    }

    #[test]
    fn expire_timeout_uses_default_on_invalid() {
        let config = ReporterConfig {
            bus: Some(BusConfig {
                expire_timeout: Some("soon".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(config.bus_expire_timeout_or_default().as_millis(), 5000);
    }

    #[test]
    fn parses_toml() {
        let content = r#"
transport = "bus"

[http]
host = "127.0.0.1"
port = 4444

[http.params]
sound = "Glass"

[bus]
expire_timeout = "10s"
"#;
        let config: ReporterConfig = toml::from_str(content).unwrap();
        assert_eq!(config.transport_kind(), Some(TransportKind::Bus));
        assert_eq!(config.http_host_or_default(), "127.0.0.1");
        assert_eq!(config.http_port_or_default(), 4444);
        assert_eq!(config.http_params().len(), 1);
        assert_eq!(config.bus_expire_timeout_or_default().as_millis(), 10_000);
    }
}
