use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::error::FetchError;
use crate::models::coin::{Coin, SearchMatch};
use crate::traits::market_provider::MarketDataProvider;

/// How failed requests are retried before the error surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self { retries, base_delay, max_delay }
    }

    /// Exponential backoff, never shorter than a server-provided retry-after
    /// and never longer than `max_delay`
    pub fn delay_for(&self, attempt: u32, error: &FetchError) -> Duration {
        let backoff = self
            .base_delay
            .saturating_mul(1u32 << attempt.min(16))
            .min(self.max_delay);

        // a server-provided delay wins over backoff but never exceeds the cap
        match error.retry_after_ms() {
            Some(ms) => backoff.max(Duration::from_millis(ms)).min(self.max_delay),
            None => backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let config = TrackerConfig::default();
        Self::new(config.retries, config.retry_base_delay, config.retry_max_delay)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

/// Provider decorator with a staleness-window cache and bounded retries
pub struct CachedMarketProvider {
    inner: Arc<dyn MarketDataProvider>,
    stale_time: Duration,
    gc_time: Duration,
    policy: RetryPolicy,
    markets: DashMap<String, CacheEntry<Vec<Coin>>>,
    searches: DashMap<String, CacheEntry<Vec<SearchMatch>>>,
}

impl CachedMarketProvider {
    /// Wrap a provider
    pub fn new(inner: Arc<dyn MarketDataProvider>, stale_time: Duration, policy: RetryPolicy) -> Self {
        Self {
            inner,
            stale_time,
            gc_time: TrackerConfig::default().gc_time,
            policy,
            markets: DashMap::new(),
            searches: DashMap::new(),
        }
    }

    /// Wrap a provider using the timings from `config`
    pub fn from_config(inner: Arc<dyn MarketDataProvider>, config: &TrackerConfig) -> Self {
        Self::new(
            inner,
            config.stale_time,
            RetryPolicy::new(config.retries, config.retry_base_delay, config.retry_max_delay),
        )
        .with_gc_time(config.gc_time)
    }

    /// Entries untouched for longer than this are evicted on the next insert
    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    fn collect_garbage(&self) {
        let gc_time = self.gc_time;
        let before = self.cached_entries();
        self.markets.retain(|_, entry| entry.fetched_at.elapsed() < gc_time);
        self.searches.retain(|_, entry| entry.fetched_at.elapsed() < gc_time);
        let evicted = before - self.cached_entries();
        if evicted > 0 {
            debug!("Evicted {} expired cache entries", evicted);
        }
    }

    /// Number of cached responses
    pub fn cached_entries(&self) -> usize {
        self.markets.len() + self.searches.len()
    }

    fn fresh<T: Clone>(&self, cache: &DashMap<String, CacheEntry<T>>, key: &str) -> Option<T> {
        let entry = cache.get(key)?;
        if entry.fetched_at.elapsed() < self.stale_time {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    async fn with_retries<T, F, Fut>(&self, what: &str, mut request: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0;
        loop {
            match request().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.policy.retries => {
                    let delay = self.policy.delay_for(attempt, &e);
                    attempt += 1;
                    warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                        what,
                        attempt,
                        self.policy.retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for CachedMarketProvider {
    async fn fetch_markets(&self, ids: &[String]) -> Result<Vec<Coin>, FetchError> {
        let key = ids.join(",");
        if let Some(coins) = self.fresh(&self.markets, &key) {
            debug!("Market cache hit for [{}]", key);
            return Ok(coins);
        }

        let what = format!("markets request [{}]", key);
        let coins = self.with_retries(&what, || self.inner.fetch_markets(ids)).await?;

        self.collect_garbage();
        self.markets.insert(
            key,
            CacheEntry {
                value: coins.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(coins)
    }

    async fn search(&self, term: &str) -> Result<Vec<SearchMatch>, FetchError> {
        if let Some(matches) = self.fresh(&self.searches, term) {
            debug!("Search cache hit for {:?}", term);
            return Ok(matches);
        }

        let what = format!("search request {:?}", term);
        let matches = self.with_retries(&what, || self.inner.search(term)).await?;

        self.collect_garbage();
        self.searches.insert(
            term.to_string(),
            CacheEntry {
                value: matches.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(matches)
    }

    async fn invalidate(&self) {
        self.markets.clear();
        self.searches.clear();
        self.inner.invalidate().await;
    }
}
