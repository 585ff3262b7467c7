//! Sort stage: stable ordering by a selectable field and direction

use std::cmp::Ordering;

use crate::models::LogRecord;
use crate::pipeline::{SortDirection, SortField, SortSpec};

/// Return a new sequence ordered by `spec`; the input is not mutated.
///
/// Timestamps compare by epoch milliseconds with an epoch-zero sentinel
/// for unparsable values, so the ordering is total. String fields use
/// ordinal comparison (no locale collation). The underlying sort is
/// stable, so records with equal keys keep their input order in either
/// direction.
pub fn sort(records: &[LogRecord], spec: &SortSpec) -> Vec<LogRecord> {
    let mut sorted = records.to_vec();

    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, spec.field);
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    sorted
}

fn compare(a: &LogRecord, b: &LogRecord, field: SortField) -> Ordering {
    match field {
        SortField::Timestamp => a.timestamp_or_epoch().cmp(&b.timestamp_or_epoch()),
        SortField::Address => a.address.cmp(&b.address),
        SortField::Country => a.country.cmp(&b.country),
        SortField::Organization => a.organization.cmp(&b.organization),
        SortField::City => a.city.cmp(&b.city),
    }
}
