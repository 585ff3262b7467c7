use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub feed: FeedConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the collector exposing `/logs` and `/stats`
    pub base_url: String,

    /// Seconds between feed refreshes
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Records per page; constant for the pipeline's lifetime
    pub page_size: usize,

    /// Quiet period before a query value is committed, in milliseconds
    pub debounce_ms: u64,

    /// Entries per memoization cache
    pub cache_capacity: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let feed_base_url = std::env::var("FEED_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:9000".to_string());
        let refresh_interval_secs = std::env::var("FEED_REFRESH_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()?;

        let page_size = std::env::var("PAGE_SIZE")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()?;
        let debounce_ms = std::env::var("DEBOUNCE_MS")
            .unwrap_or_else(|_| "300".to_string())
            .parse::<u64>()?;
        let cache_capacity = std::env::var("CACHE_CAPACITY")
            .unwrap_or_else(|_| "256".to_string())
            .parse::<u64>()?;

        Ok(Config {
            server: ServerConfig { host, port },
            feed: FeedConfig {
                base_url: feed_base_url,
                refresh_interval_secs,
            },
            pipeline: PipelineConfig {
                page_size,
                debounce_ms,
                cache_capacity,
            },
        })
    }
}
