//! Helper bridge transport configuration
//!
//! Extra query parameters are either fixed strings or computed per
//! notification from the outcome being reported.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::outcome::{Browser, OutcomeRecord};

use super::reporter_config::{ReporterConfig, DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT};

/// Keys that address the helper and are never sent as query parameters
pub const RESERVED_KEYS: [&str; 2] = ["host", "port"];

/// Callback producing a parameter value for one notification.
/// Receives the outcome and, for per-browser notifications, the browser.
pub type ComputedParam = Arc<dyn Fn(&OutcomeRecord, Option<&Browser>) -> String + Send + Sync>;

/// A query parameter value
#[derive(Clone)]
pub enum ParamValue {
    Static(String),
    Computed(ComputedParam),
}

impl ParamValue {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&OutcomeRecord, Option<&Browser>) -> String + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Produce the value to send for this notification
    pub fn resolve(&self, record: &OutcomeRecord, browser: Option<&Browser>) -> String {
        match self {
            Self::Static(value) => value.clone(),
            Self::Computed(f) => f(record, browser),
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Static(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Static(value)
    }
}

/// Overrides supplied by the host when the plugin is constructed
#[derive(Debug, Clone, Default)]
pub struct TransportOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub params: BTreeMap<String, ParamValue>,
}

impl TransportOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Resolved helper bridge configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    pub params: BTreeMap<String, ParamValue>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            params: BTreeMap::new(),
        }
    }
}

impl TransportConfig {
    /// Build from file/env configuration (static parameters only)
    pub fn from_reporter_config(config: &ReporterConfig) -> Self {
        Self {
            host: config.http_host_or_default().to_string(),
            port: config.http_port_or_default(),
            params: config
                .http_params()
                .into_iter()
                .map(|(k, v)| (k, ParamValue::Static(v)))
                .collect(),
        }
    }

    /// Shallow merge; override keys replace existing ones
    pub fn with_overrides(mut self, overrides: TransportOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self.params.extend(overrides.params);
        self
    }

    /// Base URL of the helper bridge
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Parameters to append to a request, reserved keys excluded, in key order
    pub fn query_params<'a>(
        &'a self,
        record: &'a OutcomeRecord,
        browser: Option<&'a Browser>,
    ) -> impl Iterator<Item = (&'a str, String)> + 'a {
        self.params
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(move |(key, value)| (key.as_str(), value.resolve(record, browser)))
    }
}
