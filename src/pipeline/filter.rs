//! Filter stage: text query, date interval, address dedup
//!
//! Pure function of its inputs. Output preserves input order; the stage
//! performs no sorting.

use std::collections::HashSet;

use chrono::NaiveTime;

use crate::models::LogRecord;
use crate::pipeline::{DateInterval, FilterCriteria};

/// Narrow `records` to those matching `criteria`.
///
/// Predicates apply in order: text, date, dedup. Dedup runs last and is
/// order-sensitive; the upstream ordering decides which record wins for
/// a given address. Records whose timestamp fails to parse are excluded
/// by the date predicate (never an error).
pub fn filter(records: &[LogRecord], criteria: &FilterCriteria) -> Vec<LogRecord> {
    let query_lower = criteria.query.to_lowercase();
    let interval = criteria.date_interval.map(interval_millis);

    let mut seen_addresses: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();

    for record in records {
        if !matches_text(record, &criteria.query, &query_lower) {
            continue;
        }

        if let Some((start_ms, end_ms)) = interval {
            match record.timestamp_millis() {
                Some(ts) if ts >= start_ms && ts <= end_ms => {}
                _ => continue,
            }
        }

        if criteria.dedup_by_address && !seen_addresses.insert(record.address.as_str()) {
            continue;
        }

        result.push(record.clone());
    }

    result
}

/// Text predicate: empty query matches everything; otherwise the
/// lowercased query must appear in the lowercased country or
/// organization, or the raw query in the address. Addresses carry no
/// case variance, so address matching stays case-sensitive.
fn matches_text(record: &LogRecord, query: &str, query_lower: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    record.country.to_lowercase().contains(query_lower)
        || record.organization.to_lowercase().contains(query_lower)
        || record.address.contains(query)
}

/// Expand the interval to `[start 00:00:00.000, end 23:59:59.999]` UTC
/// in epoch milliseconds.
fn interval_millis(interval: DateInterval) -> (i64, i64) {
    let start = interval
        .start
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis();

    // end of day = start of the next day minus 1ms
    let end = interval
        .end
        .succ_opt()
        .unwrap_or(interval.end)
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
        - 1;

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(address: &str, timestamp: &str, country: &str, organization: &str) -> LogRecord {
        LogRecord {
            address: address.to_string(),
            timestamp: timestamp.to_string(),
            country: country.to_string(),
            organization: organization.to_string(),
            city: String::new(),
            region: String::new(),
        }
    }

    fn sample() -> Vec<LogRecord> {
        vec![
            record("1.1.1.1", "2024-01-01T00:00:00Z", "US", "Cloudflare"),
            record("1.1.1.1", "2024-01-02T00:00:00Z", "US", "Cloudflare"),
            record("2.2.2.2", "2024-01-01T12:00:00Z", "DE", "Hetzner Online"),
        ]
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let records = sample();
        let filtered = filter(&records, &FilterCriteria::default());
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_text_query_matches_country_case_insensitive() {
        let records = sample();
        let criteria = FilterCriteria {
            query: "de".to_string(),
            ..Default::default()
        };

        let filtered = filter(&records, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].address, "2.2.2.2");
    }

    #[test]
    fn test_text_query_matches_organization() {
        let records = sample();
        let criteria = FilterCriteria {
            query: "hetzner".to_string(),
            ..Default::default()
        };

        assert_eq!(filter(&records, &criteria).len(), 1);
    }

    #[test]
    fn test_text_query_matches_address_case_sensitive() {
        let records = vec![record("10.0.0.ABC", "2024-01-01T00:00:00Z", "", "")];

        let hit = FilterCriteria {
            query: "0.ABC".to_string(),
            ..Default::default()
        };
        assert_eq!(filter(&records, &hit).len(), 1);

        // lowercased form must not match the address
        let miss = FilterCriteria {
            query: "0.abc".to_string(),
            ..Default::default()
        };
        assert!(filter(&records, &miss).is_empty());
    }

    #[test]
    fn test_date_interval_is_inclusive_full_days() {
        let records = vec![
            record("a", "2024-01-01T00:00:00Z", "", ""),
            record("b", "2024-01-02T23:59:59Z", "", ""),
            record("c", "2024-01-03T00:00:00Z", "", ""),
        ];

        let criteria = FilterCriteria {
            date_interval: Some(DateInterval {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            }),
            ..Default::default()
        };

        let filtered = filter(&records, &criteria);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].address, "a");
        assert_eq!(filtered[1].address, "b");
    }

    #[test]
    fn test_malformed_timestamp_excluded_by_date_filter() {
        let records = vec![
            record("a", "garbage", "", ""),
            record("b", "2024-01-01T10:00:00Z", "", ""),
        ];

        let criteria = FilterCriteria {
            date_interval: Some(DateInterval {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            }),
            ..Default::default()
        };

        let filtered = filter(&records, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].address, "b");
    }

    #[test]
    fn test_malformed_timestamp_survives_without_date_filter() {
        let records = vec![record("a", "garbage", "US", "")];
        assert_eq!(filter(&records, &FilterCriteria::default()).len(), 1);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let records = sample();
        let criteria = FilterCriteria {
            dedup_by_address: true,
            ..Default::default()
        };

        let filtered = filter(&records, &criteria);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].timestamp, "2024-01-01T00:00:00Z");
        assert_eq!(filtered[1].address, "2.2.2.2");
    }

    #[test]
    fn test_dedup_applies_after_text_and_date() {
        // The first "1.1.1.1" record falls outside the interval, so the
        // second one is the surviving occurrence.
        let records = sample();
        let criteria = FilterCriteria {
            date_interval: Some(DateInterval {
                start: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            }),
            dedup_by_address: true,
            ..Default::default()
        };

        let filtered = filter(&records, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].timestamp, "2024-01-02T00:00:00Z");
    }
}
