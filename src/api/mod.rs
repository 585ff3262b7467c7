//! HTTP presentation surface
//!
//! Thin collaborator over the pipeline: every endpoint returns plain
//! derived values recomputed on demand, with no mutation hooks back
//! into the record store.

mod handlers;
mod routes;

pub use handlers::{
    AggregatesQuery, AggregatesResponse, AppState, RecordsQuery, SearchQueryRequest, SearchState,
    StatsQuery, StatsResponse, StatsSource,
};
pub use routes::create_api_router;
