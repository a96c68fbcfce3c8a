//! Host platform identification and transport kinds

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::TransportKindParseError;

/// Operating system the plugin runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    /// FreeBSD, OpenBSD, NetBSD, DragonFly
    Bsd,
    Windows,
    Other(String),
}

impl Platform {
    /// Platform of the running process
    pub fn current() -> Self {
        std::env::consts::OS
            .parse()
            .unwrap_or_else(|_: Infallible| Self::Other(std::env::consts::OS.to_string()))
    }
}

impl FromStr for Platform {
    type Err = Infallible;

    /// Accepts both Rust (`macos`, `windows`) and Node-style (`darwin`,
    /// `win32`) identifiers. Anything unknown becomes `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        Ok(match id.as_str() {
            "darwin" | "macos" => Self::MacOs,
            "linux" => Self::Linux,
            "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Self::Bsd,
            "windows" | "win32" => Self::Windows,
            _ => Self::Other(id),
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::MacOs => write!(f, "macos"),
            Platform::Linux => write!(f, "linux"),
            Platform::Bsd => write!(f, "bsd"),
            Platform::Windows => write!(f, "windows"),
            Platform::Other(id) => write!(f, "{}", id),
        }
    }
}

/// Available notification transports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Local helper process addressed over loopback HTTP (macOS)
    Http,
    /// freedesktop notification service on the D-Bus session bus
    Bus,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Http => write!(f, "http"),
            TransportKind::Bus => write!(f, "bus"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = TransportKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(TransportKind::Http),
            "bus" | "dbus" => Ok(TransportKind::Bus),
            _ => Err(TransportKindParseError {
                input: s.to_string(),
            }),
        }
    }
}
