use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwapOption;
use tokio::time;
use tracing::{info, warn};

use lookout::api::{self, AppState};
use lookout::config::Config;
use lookout::feed::{FeedOutcome, HttpRecordFeed, HttpStatsFeed, RecordFeed, StatsFeed};
use lookout::pipeline::{Debouncer, QueryEngine};
use lookout::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Record store and memoizing pipeline engine
    let store = Arc::new(RecordStore::new());
    let engine = QueryEngine::new(Arc::clone(&store), config.pipeline.cache_capacity);

    // Debounce coordinator for the search query
    let search = Debouncer::spawn(Duration::from_millis(config.pipeline.debounce_ms));

    // External feeds
    let record_feed: Arc<dyn RecordFeed> = Arc::new(HttpRecordFeed::new(&config.feed.base_url)?);
    let stats_feed: Arc<dyn StatsFeed> = Arc::new(HttpStatsFeed::new(&config.feed.base_url)?);
    info!("Using feed source: {}", config.feed.base_url);

    let state = Arc::new(AppState {
        engine,
        global_stats: ArcSwapOption::empty(),
        stats_live: AtomicBool::new(false),
        search,
        page_size: config.pipeline.page_size,
    });

    // Periodic refresh of both feeds; the first tick fires immediately,
    // so the store is populated before the server starts answering.
    spawn_refresh_task(
        Arc::clone(&store),
        Arc::clone(&state),
        record_feed,
        stats_feed,
        config.feed.refresh_interval_secs,
    );

    // Start the API server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 lookout listening on http://{}", addr);
    info!("   - API endpoints available at http://{}/api/...", addr);

    axum::serve(listener, api::create_api_router(state)).await?;

    Ok(())
}

fn spawn_refresh_task(
    store: Arc<RecordStore>,
    state: Arc<AppState>,
    record_feed: Arc<dyn RecordFeed>,
    stats_feed: Arc<dyn StatsFeed>,
    interval_secs: u64,
) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;
            refresh(&store, &state, record_feed.as_ref(), stats_feed.as_ref()).await;
        }
    });
}

/// Fetch both feeds and replace the store and stats slot wholesale.
/// Failures degrade to empty values; the pipeline never sees an error.
async fn refresh(
    store: &RecordStore,
    state: &AppState,
    record_feed: &dyn RecordFeed,
    stats_feed: &dyn StatsFeed,
) {
    match record_feed.fetch().await {
        FeedOutcome::Fetched(records) => {
            info!("Loaded {} records from feed", records.len());
            store.replace(records);
        }
        FeedOutcome::Unavailable => {
            warn!("Record feed unavailable, serving an empty collection");
            store.replace(Vec::new());
        }
    }

    match stats_feed.fetch().await {
        FeedOutcome::Fetched(stats) => {
            state.global_stats.store(Some(Arc::new(stats)));
            state.stats_live.store(true, Ordering::Relaxed);
        }
        FeedOutcome::Unavailable => {
            state.global_stats.store(None);
            state.stats_live.store(false, Ordering::Relaxed);
        }
    }
}
