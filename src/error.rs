use thiserror::Error;

/// Failure of a single market data request.
///
/// Every variant collapses into the same "data fetch failed" state for the
/// watch-list; search failures are swallowed by the tracker.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Rate limited, retry after: {0}ms")]
    RateLimited(u64),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Minimum delay the server asked us to wait before the next attempt
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            FetchError::RateLimited(ms) => Some(*ms),
            _ => None,
        }
    }
}
