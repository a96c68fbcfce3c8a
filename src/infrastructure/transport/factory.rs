//! Transport selection by platform

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::{StartupError, Transport};
use crate::domain::config::{ReporterConfig, TransportConfig, TransportOverrides};
use crate::domain::platform::{Platform, TransportKind};

use super::bus::{BusSettings, BusTransport};
use super::helper::HelperLocator;
use super::http::HttpTransport;

/// Transport used on a platform when nothing is forced.
///
/// macOS uses the helper bridge; every other platform tries the session bus.
pub fn transport_kind_for(platform: &Platform) -> TransportKind {
    match platform {
        Platform::MacOs => TransportKind::Http,
        Platform::Linux | Platform::Bsd => TransportKind::Bus,
        Platform::Windows | Platform::Other(_) => TransportKind::Bus,
    }
}

/// Decide which transport to start: a configured choice wins over the
/// platform default.
pub fn resolve_transport_kind(platform: &Platform, config: &ReporterConfig) -> TransportKind {
    if let Some(raw) = config.transport.as_deref() {
        match raw.parse::<TransportKind>() {
            Ok(kind) => return kind,
            Err(e) => warn!("{}; choosing by platform", e),
        }
    }

    let kind = transport_kind_for(platform);
    if matches!(platform, Platform::Windows | Platform::Other(_)) {
        warn!(
            %platform,
            "No native notification transport for this platform, trying the session bus"
        );
    }
    kind
}

/// Create and start the transport for this process.
///
/// Only the helper bridge can fail here (helper missing or not spawnable).
/// Must be called from within a tokio runtime.
pub fn select_transport(
    platform: &Platform,
    config: &ReporterConfig,
    overrides: TransportOverrides,
) -> Result<Arc<dyn Transport>, StartupError> {
    let kind = resolve_transport_kind(platform, config);
    info!(%platform, transport = %kind, "Selected notification transport");

    match kind {
        TransportKind::Http => {
            let transport_config = TransportConfig::from_reporter_config(config).with_overrides(overrides);
            let locator = helper_locator(config);
            Ok(Arc::new(HttpTransport::start(transport_config, &locator)?))
        }
        TransportKind::Bus => Ok(Arc::new(BusTransport::connect(
            BusSettings::from_reporter_config(config),
        ))),
    }
}

fn helper_locator(config: &ReporterConfig) -> HelperLocator {
    config
        .install_root()
        .map(HelperLocator::new)
        .unwrap_or_else(HelperLocator::from_current_exe)
        .with_configured_path(config.helper_path().cloned())
}
