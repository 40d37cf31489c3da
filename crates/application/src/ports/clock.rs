//! Clock port

use chrono::{DateTime, Utc};

/// Supplies the timestamps stamped on created and updated variables.
///
/// Use cases take the clock as a port so tests can pin time.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
