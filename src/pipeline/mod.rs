//! In-memory log analytics pipeline
//!
//! Pure, synchronous data transforms over the record collection: filter,
//! sort, paginate, aggregate, plus derived summary stats. Every stage is
//! total over its input domain: malformed data degrades to defined
//! fallbacks, never to a panic or an error crossing the pipeline
//! boundary.
//!
//! Data flows one direction:
//! store snapshot → [`filter`] → { [`sort`] → [`paginate`] } and
//! { [`aggregate`] } and { [`stats`] }. The [`debounce`] coordinator
//! sits upstream, gating when a new query value is admitted, and
//! [`engine`] memoizes the whole composition.

pub mod aggregate;
pub mod debounce;
pub mod engine;
pub mod filter;
pub mod paginate;
pub mod sort;
pub mod stats;

pub use aggregate::{cardinality, share_of_total, top_n, AggregateBucket, GroupField};
pub use debounce::{DebounceHandle, Debouncer};
pub use engine::{PageView, QueryEngine, RankedBucket};
pub use filter::filter;
pub use paginate::{paginate, total_pages};
pub use sort::sort;
pub use stats::{filtered_stats, FilteredStats};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar-day interval, expanded to cover the full day in
/// UTC when applied. The stage does not reorder bounds; callers are
/// expected to hand in `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Combined text/date/dedup filter configuration.
///
/// `Hash + Eq` so a criteria value can key the memoization cache in
/// [`engine::QueryEngine`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    /// Free-text query; empty matches everything. Matched
    /// case-insensitively against country and organization and
    /// case-sensitively against the address.
    pub query: String,

    /// Optional inclusive date interval; applied only when present
    pub date_interval: Option<DateInterval>,

    /// Keep only the first record (in input order) per distinct address
    pub dedup_by_address: bool,
}

/// Field a record collection can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Timestamp,
    Address,
    Country,
    Organization,
    City,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort field and direction; independent of the filter criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Timestamp,
            direction: SortDirection::Descending,
        }
    }
}

/// One fixed-size slice of a sorted collection, addressed by a 1-based
/// page index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page index; 0 and past-the-end values yield empty pages
    pub page_index: usize,

    /// Records per page; constant for the pipeline's lifetime
    pub page_size: usize,
}
