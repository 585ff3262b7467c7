//! HTTP feed implementations backed by reqwest

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::feed::{FeedOutcome, RecordFeed, StatsFeed};
use crate::models::{GlobalStats, LogRecord};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a single fetch attempt failed; internal to this module, callers
/// only ever see a [`FeedOutcome`]
#[derive(Debug, Error)]
enum FeedError {
    #[error("feed request failed: {0}")]
    Transport(reqwest::Error),
    #[error("feed response could not be decoded: {0}")]
    Decode(reqwest::Error),
}

fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build feed HTTP client")
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> std::result::Result<T, FeedError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(FeedError::Transport)?;

    response.json::<T>().await.map_err(FeedError::Decode)
}

/// Record feed fetching the full log collection from an HTTP endpoint
pub struct HttpRecordFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpRecordFeed {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: format!("{}/logs", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl RecordFeed for HttpRecordFeed {
    async fn fetch(&self) -> FeedOutcome<Vec<LogRecord>> {
        match fetch_json::<Vec<LogRecord>>(&self.client, &self.url).await {
            Ok(records) => {
                debug!("Record feed returned {} records", records.len());
                FeedOutcome::Fetched(records)
            }
            Err(e) => {
                warn!("Record feed unavailable: {}", e);
                FeedOutcome::Unavailable
            }
        }
    }
}

/// Stats feed fetching the precomputed global snapshot
pub struct HttpStatsFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpStatsFeed {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: format!("{}/stats", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl StatsFeed for HttpStatsFeed {
    async fn fetch(&self) -> FeedOutcome<GlobalStats> {
        match fetch_json::<GlobalStats>(&self.client, &self.url).await {
            Ok(stats) => FeedOutcome::Fetched(stats),
            Err(e) => {
                warn!("Stats feed unavailable: {}", e);
                FeedOutcome::Unavailable
            }
        }
    }
}
