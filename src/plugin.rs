//! Plugin bootstrap
//!
//! Builds a ready [`NotificationReporter`] from everything the host hands
//! over at construction time: transport overrides, a time formatter, and
//! optionally an explicit platform or configuration.

use std::env;
use std::sync::Arc;

use tracing::warn;

use crate::application::ports::{ConfigStore, StartupError, TimeFormatter};
use crate::application::{MessageFormatter, NotificationReporter};
use crate::domain::config::{HttpConfig, ReporterConfig, TransportOverrides};
use crate::domain::error::ConfigError;
use crate::domain::platform::Platform;
use crate::infrastructure::{select_transport, IntervalFormatter, XdgConfigStore};

/// Force a transport ("http" or "bus")
pub const ENV_TRANSPORT: &str = "TESTRUN_NOTIFIER_TRANSPORT";
/// Helper bridge host
pub const ENV_HOST: &str = "TESTRUN_NOTIFIER_HOST";
/// Helper bridge port
pub const ENV_PORT: &str = "TESTRUN_NOTIFIER_PORT";
/// Explicit helper executable
pub const ENV_HELPER: &str = "TESTRUN_NOTIFIER_HELPER";

/// Build the environment config layer from a variable lookup
pub fn config_from_vars<F>(get: F) -> Result<ReporterConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| get(key).filter(|s| !s.is_empty());

    let port = match get(ENV_PORT) {
        Some(raw) => Some(raw.parse::<u16>().map_err(|e| ConfigError::ValidationError {
            key: ENV_PORT.to_string(),
            message: e.to_string(),
        })?),
        None => None,
    };

    let host = get(ENV_HOST);
    let helper_path = get(ENV_HELPER).map(Into::into);
    let http = if host.is_some() || port.is_some() || helper_path.is_some() {
        Some(HttpConfig {
            host,
            port,
            helper_path,
            ..Default::default()
        })
    } else {
        None
    };

    Ok(ReporterConfig {
        transport: get(ENV_TRANSPORT),
        http,
        bus: None,
    })
}

/// Load and merge configuration: defaults < file < env.
///
/// A broken file or environment layer is logged and skipped.
pub async fn load_merged_config(store: &dyn ConfigStore) -> ReporterConfig {
    let file_config = store.load().await.unwrap_or_else(|e| {
        warn!(path = %store.path().display(), "Ignoring config file: {}", e);
        ReporterConfig::empty()
    });

    let env_config = config_from_vars(|key| env::var(key).ok()).unwrap_or_else(|e| {
        warn!("Ignoring environment config: {}", e);
        ReporterConfig::empty()
    });

    ReporterConfig::defaults().merge(file_config).merge(env_config)
}

/// Entry point for hosts embedding the notifier
pub struct NotificationPlugin;

impl NotificationPlugin {
    pub fn builder() -> PluginBuilder {
        PluginBuilder::default()
    }
}

/// Collects host-supplied collaborators before startup
#[derive(Default)]
pub struct PluginBuilder {
    platform: Option<Platform>,
    overrides: TransportOverrides,
    time_formatter: Option<Arc<dyn TimeFormatter>>,
    config_store: Option<Box<dyn ConfigStore>>,
    config: Option<ReporterConfig>,
}

impl PluginBuilder {
    /// Platform to select for (default: the running OS)
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Host overrides for the helper bridge (host, port, extra params)
    pub fn overrides(mut self, overrides: TransportOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Formatter for run times (default: [`IntervalFormatter`])
    pub fn time_formatter(mut self, formatter: Arc<dyn TimeFormatter>) -> Self {
        self.time_formatter = Some(formatter);
        self
    }

    /// Where to read the config file from (default: XDG config dir)
    pub fn config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    /// Use this configuration as-is instead of loading file and env layers
    pub fn config(mut self, config: ReporterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration, start the transport, and return the reporter.
    ///
    /// Fails only when the selected transport can never deliver
    /// (helper bridge missing or not spawnable).
    pub async fn start(self) -> Result<NotificationReporter, StartupError> {
        let config = match self.config {
            Some(config) => config,
            None => {
                let store = self
                    .config_store
                    .unwrap_or_else(|| Box::new(XdgConfigStore::new()) as Box<dyn ConfigStore>);
                load_merged_config(store.as_ref()).await
            }
        };

        let platform = self.platform.unwrap_or_else(Platform::current);
        let transport = select_transport(&platform, &config, self.overrides)?;
        let time_formatter = self
            .time_formatter
            .unwrap_or_else(|| Arc::new(IntervalFormatter::new()) as Arc<dyn TimeFormatter>);

        Ok(NotificationReporter::new(
            transport,
            MessageFormatter::new(time_formatter),
        ))
    }
}
