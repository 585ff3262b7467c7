use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::GlobalStats;
use crate::pipeline::{
    DateInterval, DebounceHandle, FilterCriteria, FilteredStats, GroupField, PageRequest, PageView,
    QueryEngine, RankedBucket, SortDirection, SortField, SortSpec,
};

pub struct AppState {
    pub engine: QueryEngine,
    pub global_stats: ArcSwapOption<GlobalStats>,
    pub stats_live: AtomicBool,
    pub search: DebounceHandle,
    pub page_size: usize,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Filter/sort/page parameters for the records endpoint. A missing
/// `query` falls back to the debounced session query, so the
/// coordinator gates the pipeline exactly as a keystroke-driven view
/// would.
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    /// Free-text filter; omitted means "use the committed search query"
    pub query: Option<String>,

    /// Inclusive interval start (YYYY-MM-DD); applied only with `end`
    pub start: Option<NaiveDate>,

    /// Inclusive interval end (YYYY-MM-DD); applied only with `start`
    pub end: Option<NaiveDate>,

    /// Keep only the first record per distinct address
    #[serde(default)]
    pub dedup: bool,

    pub sort_by: Option<SortField>,

    pub direction: Option<SortDirection>,

    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct AggregatesQuery {
    pub query: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub dedup: bool,

    /// Grouping field (default: country)
    pub field: Option<GroupField>,

    /// Bucket limit (default: 10, max: 100)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Serialize)]
pub struct AggregatesResponse {
    pub buckets: Vec<RankedBucket>,
    pub total: usize,
}

/// Filter parameters for the stats endpoint
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub query: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub dedup: bool,
}

#[derive(Serialize)]
pub struct StatsResponse {
    /// Externally computed snapshot; zeroed when the stats feed is down
    pub global: GlobalStats,

    /// Marker distinguishing a live snapshot from a degraded one
    pub source: StatsSource,

    /// Stats derived from the currently filtered record collection
    pub filtered: FilteredStats,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    Live,
    Unavailable,
}

#[derive(Debug, Deserialize)]
pub struct SearchQueryRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct SearchState {
    /// Query value last admitted into the pipeline
    pub committed: String,

    /// True while a newer raw value is waiting out its quiet period
    pub pending: bool,
}

fn build_criteria(
    state: &AppState,
    query: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    dedup: bool,
) -> FilterCriteria {
    let query = query.unwrap_or_else(|| state.search.committed());

    // the date predicate only applies when both bounds are present
    let date_interval = match (start, end) {
        (Some(start), Some(end)) => Some(DateInterval { start, end }),
        _ => None,
    };

    FilterCriteria {
        query,
        date_interval,
        dedup_by_address: dedup,
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}

/// Sorted, paginated page of the filtered record collection
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Json<PageView> {
    let criteria = build_criteria(&state, params.query, params.start, params.end, params.dedup);

    let spec = SortSpec {
        field: params.sort_by.unwrap_or(SortField::Timestamp),
        direction: params.direction.unwrap_or(SortDirection::Descending),
    };

    let page = PageRequest {
        page_index: params.page,
        page_size: state.page_size,
    };

    Json(state.engine.page(&criteria, &spec, &page))
}

/// Top-N aggregate buckets over the filtered collection
pub async fn list_aggregates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AggregatesQuery>,
) -> Json<AggregatesResponse> {
    let limit = params.limit.min(100).max(1) as usize;
    let field = params.field.unwrap_or(GroupField::Country);

    let criteria = build_criteria(&state, params.query, params.start, params.end, params.dedup);
    let buckets = state.engine.top_buckets(&criteria, field, limit);
    let total = buckets.len();

    Json(AggregatesResponse { buckets, total })
}

/// Global snapshot plus stats derived from the filtered collection
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let criteria = build_criteria(&state, params.query, params.start, params.end, params.dedup);

    let (global, source) = match state.global_stats.load_full() {
        Some(stats) if state.stats_live.load(Ordering::Relaxed) => {
            ((*stats).clone(), StatsSource::Live)
        }
        Some(stats) => ((*stats).clone(), StatsSource::Unavailable),
        None => (GlobalStats::default(), StatsSource::Unavailable),
    };

    Json(StatsResponse {
        global,
        source,
        filtered: state.engine.filtered_stats(&criteria),
    })
}

/// Feed a new raw value into the debounce coordinator
pub async fn update_search_query(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchQueryRequest>,
) -> Json<SearchState> {
    state.search.update(payload.query);

    Json(SearchState {
        committed: state.search.committed(),
        pending: state.search.is_pending(),
    })
}

/// Committed query and pending flag of the debounce coordinator
pub async fn get_search_state(State(state): State<Arc<AppState>>) -> Json<SearchState> {
    Json(SearchState {
        committed: state.search.committed(),
        pending: state.search.is_pending(),
    })
}
