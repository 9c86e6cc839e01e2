use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::coin::{Coin, SearchMatch, SearchResponse};
use crate::traits::market_provider::MarketDataProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_AFTER_MS: u64 = 1000;

/// REST provider backed by the CoinGecko public API
#[derive(Clone)]
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Create a provider for the given API base URL
    pub fn new(base_url: impl Into<String>) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("crypto-price-tracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a response into a typed body or the matching error
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_ms(
                response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok()),
            );
            warn!("CoinGecko rate limit hit. Retry after {}ms", retry_after);
            return Err(FetchError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Milliseconds to wait from a `Retry-After` header given in seconds
fn retry_after_ms(header: Option<&str>) -> u64 {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1000))
        .unwrap_or(DEFAULT_RETRY_AFTER_MS)
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(&self, ids: &[String]) -> Result<Vec<Coin>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/coins/markets", self.base_url);
        let joined = ids.join(",");
        debug!("GET {} ids={}", url, joined);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("ids", joined.as_str()),
                ("order", "market_cap_desc"),
                ("sparkline", "false"),
                ("price_change_percentage", "24h"),
            ])
            .send()
            .await?;

        let coins: Vec<Coin> = Self::read_json(response).await?;
        debug!("Received {} market records", coins.len());
        Ok(coins)
    }

    async fn search(&self, term: &str) -> Result<Vec<SearchMatch>, FetchError> {
        let url = format!("{}/search", self.base_url);
        debug!("GET {} query={}", url, term);

        let response = self.client.get(&url).query(&[("query", term)]).send().await?;

        let results: SearchResponse = Self::read_json(response).await?;
        Ok(results.coins)
    }
}
