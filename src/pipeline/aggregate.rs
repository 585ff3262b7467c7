//! Aggregation stage: group-count-rank-truncate plus field cardinality
//!
//! Buckets are derived values, recomputed from the current filtered set
//! on every request and never persisted.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::LogRecord;

/// Categorical record field the aggregation stage can group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    Address,
    Country,
    Organization,
    City,
    Region,
}

impl GroupField {
    fn value<'a>(&self, record: &'a LogRecord) -> &'a str {
        match self {
            GroupField::Address => &record.address,
            GroupField::Country => &record.country,
            GroupField::Organization => &record.organization,
            GroupField::City => &record.city,
            GroupField::Region => &record.region,
        }
    }
}

/// One group-and-count result, keyed by the grouping field's value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateBucket {
    pub key: String,
    pub count: u64,
}

/// Group `records` by `field` (exact string equality), count members,
/// rank by count descending and truncate to the first `n` buckets.
///
/// Equal counts rank in first-encountered-group order, keeping the
/// output deterministic for a given input ordering.
pub fn top_n(records: &[LogRecord], field: GroupField, n: usize) -> Vec<AggregateBucket> {
    // value -> (first-seen index, count)
    let mut groups: HashMap<&str, (usize, u64)> = HashMap::new();

    for record in records {
        let next_index = groups.len();
        let entry = groups.entry(field.value(record)).or_insert((next_index, 0));
        entry.1 += 1;
    }

    let mut ranked: Vec<(&str, usize, u64)> = groups
        .into_iter()
        .map(|(key, (first_seen, count))| (key, first_seen, count))
        .collect();

    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
    ranked.truncate(n);

    ranked
        .into_iter()
        .map(|(key, _, count)| AggregateBucket {
            key: key.to_string(),
            count,
        })
        .collect()
}

/// Count of distinct values observed for `field` across `records`
pub fn cardinality(records: &[LogRecord], field: GroupField) -> usize {
    records
        .iter()
        .map(|record| field.value(record))
        .collect::<HashSet<_>>()
        .len()
}

/// Ratio of a bucket against the filtered total, for chart legends.
/// An empty filtered set yields 0.0 rather than a fault.
pub fn share_of_total(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}
