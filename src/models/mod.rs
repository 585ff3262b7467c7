//! Data models for log records and aggregate statistics

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// A single observed request, as delivered by the record feed.
///
/// Records are created in bulk when the store is repopulated and never
/// mutated afterwards. The timestamp is kept in its wire form (ISO-8601
/// string) and parsed lazily; a record with a malformed timestamp is
/// still a valid record everywhere except date filtering and time
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Network address of the client (opaque string)
    pub address: String,

    /// Instant of the request, ISO-8601 encoded
    #[serde(default)]
    pub timestamp: String,

    /// Country name
    #[serde(default)]
    pub country: String,

    /// Owning organization / network operator
    #[serde(default)]
    pub organization: String,

    /// City name
    #[serde(default)]
    pub city: String,

    /// Region/state/province
    #[serde(default)]
    pub region: String,
}

impl LogRecord {
    /// Parse the wire timestamp into epoch milliseconds.
    ///
    /// Returns `None` for anything that is not valid RFC 3339.
    pub fn timestamp_millis(&self) -> Option<i64> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.timestamp_millis())
    }

    /// Epoch milliseconds with an epoch-zero sentinel for malformed
    /// timestamps, so time ordering is total.
    pub fn timestamp_or_epoch(&self) -> i64 {
        self.timestamp_millis().unwrap_or(0)
    }
}

/// One day of the externally computed per-day breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayCount {
    /// Calendar day, `YYYY-MM-DD`
    pub day: String,

    /// Hits observed on that day
    pub count: u64,
}

/// Externally supplied aggregate snapshot.
///
/// This is never recomputed from the in-memory record collection; it is
/// replaced wholesale on each stats-feed refresh and displayed alongside
/// the locally derived [`FilteredStats`](crate::pipeline::FilteredStats).
/// An absent snapshot reads as all zeroes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Total hits across the full history
    #[serde(default)]
    pub total_hits: u64,

    /// Count of distinct addresses ever observed
    #[serde(default)]
    pub unique_addresses: u64,

    /// Count of distinct countries ever observed
    #[serde(default)]
    pub unique_countries: u64,

    /// Per-day hit breakdown
    #[serde(default)]
    pub per_day: Vec<DayCount>,
}
