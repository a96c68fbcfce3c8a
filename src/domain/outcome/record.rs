//! Test outcome records supplied by the host

use serde::{Deserialize, Serialize};

use super::elapsed::Elapsed;

/// Result of one test run, either for a single browser or aggregated
/// across all browsers. Supplied by the host and never mutated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutcomeRecord {
    pub success: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    /// Wall-clock time of the run in milliseconds
    pub total_time: u64,
    pub disconnected: bool,
    pub error: bool,
}

impl OutcomeRecord {
    /// Tests that actually ran (passed or failed)
    pub fn executed(&self) -> u32 {
        self.success + self.failed
    }

    pub fn elapsed(&self) -> Elapsed {
        Elapsed::from_millis(self.total_time)
    }
}

/// A browser (test runner client) together with its most recent result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Browser {
    pub name: String,
    #[serde(default)]
    pub last_result: OutcomeRecord,
}

impl Browser {
    pub fn new(name: impl Into<String>, last_result: OutcomeRecord) -> Self {
        Self {
            name: name.into(),
            last_result,
        }
    }
}
