//! Summary statistics over the filtered record subset

use serde::Serialize;

use crate::models::LogRecord;
use crate::pipeline::aggregate::{cardinality, GroupField};

/// Stats derived from the currently filtered collection, recomputed
/// whenever the filter output changes. Displayed alongside the external
/// [`GlobalStats`](crate::models::GlobalStats) snapshot, which covers
/// the full history instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilteredStats {
    pub total_hits: u64,
    pub unique_addresses: u64,
    pub unique_countries: u64,
}

/// Compute [`FilteredStats`] over `records`. An empty set degrades to
/// all zeroes.
pub fn filtered_stats(records: &[LogRecord]) -> FilteredStats {
    FilteredStats {
        total_hits: records.len() as u64,
        unique_addresses: cardinality(records, GroupField::Address) as u64,
        unique_countries: cardinality(records, GroupField::Country) as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, country: &str) -> LogRecord {
        LogRecord {
            address: address.to_string(),
            timestamp: String::new(),
            country: country.to_string(),
            organization: String::new(),
            city: String::new(),
            region: String::new(),
        }
    }

    #[test]
    fn test_filtered_stats() {
        let records = vec![
            record("1.1.1.1", "US"),
            record("1.1.1.1", "US"),
            record("2.2.2.2", "DE"),
        ];

        let stats = filtered_stats(&records);
        assert_eq!(stats.total_hits, 3);
        assert_eq!(stats.unique_addresses, 2);
        assert_eq!(stats.unique_countries, 2);
    }

    #[test]
    fn test_empty_set_degrades_to_zero() {
        assert_eq!(filtered_stats(&[]), FilteredStats::default());
    }
}
