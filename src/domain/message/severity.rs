//! Outcome severity

use std::fmt;

use crate::domain::outcome::OutcomeRecord;

/// Classification of an outcome. Exactly one applies per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Pass,
    Fail,
    Error,
}

impl Severity {
    /// Classify a record. Disconnect/error wins over failures,
    /// failures win over pass.
    pub fn classify(record: &OutcomeRecord) -> Self {
        if record.disconnected || record.error {
            Self::Error
        } else if record.failed > 0 {
            Self::Fail
        } else {
            Self::Pass
        }
    }

    /// Route segment understood by the helper bridge
    pub const fn route(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail | Self::Error => "fail",
        }
    }

    /// Get the freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Pass => "emblem-default",
            Self::Fail => "dialog-error",
            Self::Error => "face-crying",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Error => write!(f, "error"),
        }
    }
}
