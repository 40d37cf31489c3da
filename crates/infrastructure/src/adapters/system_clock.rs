//! Wall-clock timestamps for stored records.

use chrono::{DateTime, SubsecRound, Utc};
use shortpress_application::ports::Clock;

/// Stamps `created_at`/`updated_at` with the current UTC time.
///
/// Timestamps are truncated to whole milliseconds so a record read back
/// from the snapshot file compares equal to the one that was written.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates the clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}
