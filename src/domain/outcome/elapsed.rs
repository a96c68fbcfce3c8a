//! Elapsed time value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::ElapsedParseError;

/// Default display time for bus notifications (5 seconds)
pub const DEFAULT_EXPIRE_TIMEOUT_SECS: u64 = 5;

/// Value object representing an elapsed time span.
/// Immutable; millisecond precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Elapsed {
    milliseconds: u64,
}

impl Elapsed {
    /// Create an Elapsed from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Default notification display time on the session bus
    pub const fn default_expire_timeout() -> Self {
        Self::from_millis(DEFAULT_EXPIRE_TIMEOUT_SECS * 1000)
    }

    /// Get elapsed time in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }
}

impl FromStr for Elapsed {
    type Err = ElapsedParseError;

    /// Parse strings like "500ms", "5s", "1m", "2m30s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || ElapsedParseError {
            input: s.to_string(),
        };

        if let Some(ms) = input.strip_suffix("ms") {
            if ms.is_empty() || !ms.chars().all(|c| c.is_ascii_digit()) {
                return Err(err());
            }
            return ms.parse().map(Self::from_millis).map_err(|_| err());
        }

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num.parse().map_err(|_| err())?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num.parse().map_err(|_| err())?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(err());
            }
        }

        if !current_num.is_empty() || !found_any {
            return Err(err());
        }

        minutes
            .checked_mul(60)
            .and_then(|secs| secs.checked_add(seconds))
            .and_then(|secs| secs.checked_mul(1000))
            .map(Self::from_millis)
            .ok_or_else(err)
    }
}

impl fmt::Display for Elapsed {
    /// Tenth-of-a-second precision: "1.2s", "3.0s", "2m 5.0s"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.milliseconds.saturating_add(50) / 100;
        let minutes = tenths / 600;
        let rest = tenths % 600;
        let (secs, tenth) = (rest / 10, rest % 10);

        if minutes == 0 {
            write!(f, "{}.{}s", secs, tenth)
        } else {
            write!(f, "{}m {}.{}s", minutes, secs, tenth)
        }
    }
}
