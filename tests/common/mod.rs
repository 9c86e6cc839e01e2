#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crypto_price_tracker::{
    Coin, FetchError, MarketDataProvider, MarketEventHandler, MarketTracker, MarketView, SearchMatch,
    TrackerConfig,
};

/// In-memory market with switchable failures and per-term search latency
pub struct FakeMarket {
    coins: Vec<Coin>,
    pub fail_markets: AtomicBool,
    pub fail_search: AtomicBool,
    pub market_calls: AtomicU32,
    pub search_calls: AtomicU32,
    pub invalidations: AtomicU32,
    pub requested_ids: Mutex<Vec<Vec<String>>>,
    search_delays: Mutex<HashMap<String, Duration>>,
}

impl FakeMarket {
    pub fn new(coins: Vec<Coin>) -> Arc<Self> {
        Arc::new(Self {
            coins,
            fail_markets: AtomicBool::new(false),
            fail_search: AtomicBool::new(false),
            market_calls: AtomicU32::new(0),
            search_calls: AtomicU32::new(0),
            invalidations: AtomicU32::new(0),
            requested_ids: Mutex::new(Vec::new()),
            search_delays: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_default_coins() -> Arc<Self> {
        Self::new(default_coins())
    }

    pub fn delay_search(&self, term: &str, delay: Duration) {
        self.search_delays.lock().unwrap().insert(term.to_string(), delay);
    }

    pub fn market_calls(&self) -> u32 {
        self.market_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> u32 {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn last_requested_ids(&self) -> Vec<String> {
        self.requested_ids.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl MarketDataProvider for FakeMarket {
    async fn fetch_markets(&self, ids: &[String]) -> Result<Vec<Coin>, FetchError> {
        self.market_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_ids.lock().unwrap().push(ids.to_vec());

        if self.fail_markets.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                status: 500,
                message: "upstream unavailable".to_string(),
            });
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.coins.iter().find(|coin| &coin.id == id).cloned())
            .collect())
    }

    async fn search(&self, term: &str) -> Result<Vec<SearchMatch>, FetchError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.search_delays.lock().unwrap().get(term).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_search.load(Ordering::SeqCst) {
            return Err(FetchError::Decode("unexpected body".to_string()));
        }

        let needle = term.to_lowercase();
        Ok(self
            .coins
            .iter()
            .filter(|coin| coin.id.contains(&needle) || coin.name.to_lowercase().contains(&needle))
            .map(|coin| SearchMatch {
                id: coin.id.clone(),
                name: coin.name.clone(),
                symbol: Some(coin.symbol.to_uppercase()),
                market_cap_rank: coin.market_cap_rank,
                thumb: None,
            })
            .collect())
    }

    async fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Presenter that keeps every frame
#[derive(Default)]
pub struct RecordingHandler {
    views: Mutex<Vec<MarketView>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn frames(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<MarketView> {
        self.views.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MarketEventHandler for RecordingHandler {
    async fn handle_view(&self, view: &MarketView) {
        self.views.lock().unwrap().push(view.clone());
    }
}

pub fn default_coins() -> Vec<Coin> {
    vec![
        Coin::new("bitcoin", "Bitcoin", "btc", 50000.0).with_rank(1).with_change(2.5),
        Coin::new("ethereum", "Ethereum", "eth", 3000.0).with_rank(2).with_change(-1.2),
        Coin::new("solana", "Solana", "sol", 150.0).with_rank(5).with_change(4.1),
        Coin::new("matic-network", "Polygon", "matic", 0.7).with_rank(20),
        Coin::new("dogecoin", "Dogecoin", "doge", 0.12).with_rank(8).with_change(-3.0),
        Coin::new("bitcoin-cash", "Bitcoin Cash", "bch", 400.0).with_rank(18).with_change(1.0),
        Coin::new("wrapped-bitcoin", "Wrapped Bitcoin", "wbtc", 49900.0).with_rank(14),
        Coin::new("bitcoin-gold", "Bitcoin Gold", "btg", 20.0).with_rank(300),
        Coin::new("bitcoin-sv", "Bitcoin SV", "bsv", 60.0).with_rank(70),
        Coin::new("bitcoin-avalanche-bridged", "Bitcoin Avalanche Bridged", "btcb", 50010.0),
        Coin::new("ethereum-classic", "Ethereum Classic", "etc", 25.0).with_rank(25),
    ]
}

pub fn test_config() -> TrackerConfig {
    TrackerConfig {
        search_debounce: Duration::ZERO,
        ..TrackerConfig::default()
    }
}

pub fn tracker_with(market: Arc<FakeMarket>, handler: Arc<RecordingHandler>) -> MarketTracker {
    MarketTracker::new(test_config(), market, handler)
}

pub fn ids(view: &MarketView) -> Vec<String> {
    view.coins().iter().map(|coin| coin.id.clone()).collect()
}
