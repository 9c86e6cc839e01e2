use std::time::Duration;

/// Public CoinGecko endpoint
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Coins always shown on the dashboard
pub const DEFAULT_WATCHLIST: [&str; 5] = ["bitcoin", "ethereum", "solana", "matic-network", "dogecoin"];

/// Tracker settings. Only the API endpoint is read from the environment.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub api_url: String,
    pub watchlist: Vec<String>,
    pub refresh_interval: Duration,
    pub stale_time: Duration,
    pub gc_time: Duration,
    pub retries: u32,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
    pub search_debounce: Duration,
    pub search_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            watchlist: DEFAULT_WATCHLIST.iter().map(|id| id.to_string()).collect(),
            refresh_interval: Duration::from_secs(30),
            stale_time: Duration::from_secs(20),
            gc_time: Duration::from_secs(300),
            retries: 2,
            retry_base_delay: Duration::from_secs(1),
            retry_max_delay: Duration::from_secs(30),
            search_debounce: Duration::from_millis(300),
            search_limit: 5,
        }
    }
}

impl TrackerConfig {
    /// Defaults, with `COINGECKO_API_URL` overriding the endpoint
    pub fn from_env() -> Self {
        Self::default().with_api_url(std::env::var("COINGECKO_API_URL").ok())
    }

    fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                self.api_url = url.to_string();
            }
        }
        self
    }
}
