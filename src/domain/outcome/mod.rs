//! Outcome domain module

mod elapsed;
mod record;

pub use elapsed::{Elapsed, DEFAULT_EXPIRE_TIMEOUT_SECS};
pub use record::{Browser, OutcomeRecord};
