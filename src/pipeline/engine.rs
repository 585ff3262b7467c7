//! Memoized composition of the pipeline stages
//!
//! Derived values recompute only when a tracked input actually changed:
//! cache keys pair the store generation with the request parameters, so
//! a wholesale store replacement invalidates everything implicitly and
//! repeated UI events with unchanged parameters hit the cache instead
//! of re-filtering and re-sorting the full collection.
//!
//! Correctness never depends on the cache: every entry is recomputable
//! from the pure stage functions.

use std::sync::Arc;

use moka::sync::Cache;
use serde::Serialize;
use tracing::debug;

use crate::models::LogRecord;
use crate::pipeline::{
    aggregate, filter::filter, paginate, sort::sort, stats, FilterCriteria, FilteredStats,
    PageRequest, SortSpec,
};
use crate::store::RecordStore;

type FilterKey = (u64, FilterCriteria);
type SortKey = (u64, FilterCriteria, SortSpec);

/// One sorted, paginated page of the filtered collection plus totals
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub records: Vec<LogRecord>,
    pub page_index: usize,
    pub page_size: usize,
    pub total_records: usize,
    pub total_pages: usize,
}

/// Aggregate bucket enriched with its share of the filtered total,
/// ready for a chart legend
#[derive(Debug, Clone, Serialize)]
pub struct RankedBucket {
    pub key: String,
    pub count: u64,
    pub share: f64,
}

/// Memoizing front door to the pipeline
pub struct QueryEngine {
    store: Arc<RecordStore>,
    filter_cache: Cache<FilterKey, Arc<Vec<LogRecord>>>,
    sort_cache: Cache<SortKey, Arc<Vec<LogRecord>>>,
}

impl QueryEngine {
    pub fn new(store: Arc<RecordStore>, cache_capacity: u64) -> Self {
        Self {
            store,
            filter_cache: Cache::new(cache_capacity),
            sort_cache: Cache::new(cache_capacity),
        }
    }

    /// Filtered subset for `criteria`, memoized per store generation
    pub fn filtered(&self, criteria: &FilterCriteria) -> Arc<Vec<LogRecord>> {
        let snapshot = self.store.snapshot();
        let key = (snapshot.generation, criteria.clone());

        self.filter_cache.get_with(key, || {
            debug!(
                generation = snapshot.generation,
                total = snapshot.records.len(),
                "Recomputing filtered subset"
            );
            Arc::new(filter(&snapshot.records, criteria))
        })
    }

    /// Filtered-then-sorted sequence, memoized per store generation
    pub fn sorted(&self, criteria: &FilterCriteria, spec: &SortSpec) -> Arc<Vec<LogRecord>> {
        let snapshot = self.store.snapshot();
        let key = (snapshot.generation, criteria.clone(), *spec);

        self.sort_cache.get_with(key, || {
            let filtered = self.filtered(criteria);
            Arc::new(sort(&filtered, spec))
        })
    }

    /// Sorted, paginated page plus totals
    pub fn page(&self, criteria: &FilterCriteria, spec: &SortSpec, page: &PageRequest) -> PageView {
        let sorted = self.sorted(criteria, spec);

        PageView {
            records: paginate::paginate(&sorted, page),
            page_index: page.page_index,
            page_size: page.page_size,
            total_records: sorted.len(),
            total_pages: paginate::total_pages(sorted.len(), page.page_size),
        }
    }

    /// Top-`n` buckets for `field` over the filtered subset, each with
    /// its share of the filtered total
    pub fn top_buckets(
        &self,
        criteria: &FilterCriteria,
        field: aggregate::GroupField,
        n: usize,
    ) -> Vec<RankedBucket> {
        let filtered = self.filtered(criteria);
        let total = filtered.len() as u64;

        aggregate::top_n(&filtered, field, n)
            .into_iter()
            .map(|bucket| RankedBucket {
                share: aggregate::share_of_total(bucket.count, total),
                key: bucket.key,
                count: bucket.count,
            })
            .collect()
    }

    /// Summary stats over the filtered subset
    pub fn filtered_stats(&self, criteria: &FilterCriteria) -> FilteredStats {
        stats::filtered_stats(&self.filtered(criteria))
    }
}
