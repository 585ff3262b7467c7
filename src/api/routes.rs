use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::handlers::{
    get_search_state, get_stats, health_check, list_aggregates, list_records,
    update_search_query, AppState,
};

pub fn create_api_router(state: Arc<AppState>) -> Router {
    // The dashboard frontend is served from a different origin, so the
    // API answers cross-origin reads.
    Router::new()
        .route("/health", get(health_check))
        .route("/api/records", get(list_records))
        .route("/api/aggregates", get(list_aggregates))
        .route("/api/stats", get(get_stats))
        .route("/api/search", get(get_search_state))
        .route("/api/search/query", put(update_search_query))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
