use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::commands::Command;
use crate::config::TrackerConfig;
use crate::error::FetchError;
use crate::models::{
    coin::Coin,
    market::merge_and_sort,
    view::{is_searchable, MarketView, SortKey, ViewState, ViewStatus},
};
use crate::traits::{event_handler::MarketEventHandler, market_provider::MarketDataProvider};

/// Search results tagged with the request that produced them
#[derive(Debug, Clone)]
struct SearchResults {
    term: String,
    generation: u64,
    coins: Vec<Coin>,
}

#[derive(Debug)]
struct TrackerState {
    view: ViewState,
    watchlist: ViewStatus,
    watchlist_launched: u64,
    watchlist_applied: u64,
    search: Option<SearchResults>,
    search_launched: u64,
    pending_search: Option<u64>,
}

impl TrackerState {
    fn new() -> Self {
        Self {
            view: ViewState::new(),
            watchlist: ViewStatus::Loading,
            watchlist_launched: 0,
            watchlist_applied: 0,
            search: None,
            search_launched: 0,
            pending_search: None,
        }
    }

    fn begin_search(&mut self) -> u64 {
        self.search_launched += 1;
        self.pending_search = Some(self.search_launched);
        self.search_launched
    }

    /// Search rows that belong to the term currently in view
    fn visible_search(&self) -> &[Coin] {
        match &self.search {
            Some(results) if self.view.has_active_search() && results.term == self.view.search_term => {
                &results.coins
            }
            _ => &[],
        }
    }
}

/// Dashboard controller: owns the view state, drives both queries and
/// pushes every change to the presenter.
#[derive(Clone)]
pub struct MarketTracker {
    config: Arc<TrackerConfig>,
    provider: Arc<dyn MarketDataProvider>,
    event_handler: Arc<dyn MarketEventHandler>,
    state: Arc<Mutex<TrackerState>>,
}

impl MarketTracker {
    /// Create a new market tracker
    pub fn new(
        config: TrackerConfig,
        provider: Arc<dyn MarketDataProvider>,
        event_handler: Arc<dyn MarketEventHandler>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            event_handler,
            state: Arc::new(Mutex::new(TrackerState::new())),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Fetch market records for the configured watch-list
    pub async fn fetch_watchlist(&self) -> Result<Vec<Coin>, FetchError> {
        self.provider.fetch_markets(&self.config.watchlist).await
    }

    /// Resolve a search term into at most `search_limit` priced coins.
    ///
    /// Short terms never touch the network. Failures are logged and
    /// degrade to an empty result.
    pub async fn fetch_search(&self, term: &str) -> Vec<Coin> {
        if !is_searchable(term) {
            return Vec::new();
        }

        match self.resolve_search(term).await {
            Ok(coins) => coins,
            Err(e) => {
                warn!("Search for {:?} failed, showing no search results: {}", term, e);
                Vec::new()
            }
        }
    }

    async fn resolve_search(&self, term: &str) -> Result<Vec<Coin>, FetchError> {
        let ids: Vec<String> = self
            .provider
            .search(term)
            .await?
            .into_iter()
            .take(self.config.search_limit)
            .map(|m| m.id)
            .collect();

        if ids.is_empty() {
            debug!("No matches for {:?}", term);
            return Ok(Vec::new());
        }

        self.provider.fetch_markets(&ids).await
    }

    /// Refetch the watch-list and publish the outcome
    pub async fn refresh_watchlist(&self) {
        let generation = {
            let mut state = self.state.lock().await;
            state.watchlist_launched += 1;
            state.watchlist_launched
        };

        let status = match self.fetch_watchlist().await {
            Ok(coins) => {
                info!("Fetched {} watch-list coins", coins.len());
                ViewStatus::Ready {
                    coins,
                    updated_at: Utc::now(),
                }
            }
            Err(e) => {
                error!("Error fetching coins data: {}", e);
                ViewStatus::Failed(format!("Error fetching coins data: {}", e))
            }
        };

        let applied = {
            let mut state = self.state.lock().await;
            if generation > state.watchlist_applied {
                state.watchlist_applied = generation;
                state.watchlist = status;
                true
            } else {
                debug!("Dropping out-of-date watch-list response #{}", generation);
                false
            }
        };

        if applied {
            self.render().await;
        }
    }

    /// Update the search term and start a debounced search for it
    pub async fn set_search_term(&self, term: &str) -> Option<JoinHandle<()>> {
        let generation = {
            let mut state = self.state.lock().await;
            state.view.set_search_term(term);
            if state.view.has_active_search() {
                Some(state.begin_search())
            } else {
                state.pending_search = None;
                None
            }
        };

        self.render().await;

        generation.map(|generation| self.spawn_search(term.to_string(), generation, self.config.search_debounce))
    }

    fn spawn_search(&self, term: String, generation: u64, debounce: Duration) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }

            if !tracker.is_latest_search(&term, generation).await {
                debug!("Search #{} for {:?} superseded before sending", generation, term);
                return;
            }

            let coins = tracker.fetch_search(&term).await;
            if tracker.apply_search_results(&term, generation, coins).await {
                tracker.render().await;
            }
        })
    }

    async fn is_latest_search(&self, term: &str, generation: u64) -> bool {
        let state = self.state.lock().await;
        state.view.search_term == term && state.pending_search == Some(generation)
    }

    /// Store search results if they still match the view.
    ///
    /// Results for a term that is no longer current, or older than the
    /// results already shown, are dropped.
    pub async fn apply_search_results(&self, term: &str, generation: u64, coins: Vec<Coin>) -> bool {
        let mut state = self.state.lock().await;

        if state.view.search_term != term {
            debug!("Dropping results for stale search term {:?}", term);
            return false;
        }

        if let Some(current) = &state.search {
            if current.term == term && generation < current.generation {
                debug!("Dropping search #{} older than #{}", generation, current.generation);
                return false;
            }
        }

        debug!("Applying {} search results for {:?}", coins.len(), term);
        state.search = Some(SearchResults {
            term: term.to_string(),
            generation,
            coins,
        });
        if state.pending_search.is_some_and(|pending| pending <= generation) {
            state.pending_search = None;
        }
        true
    }

    /// Column header click
    pub async fn toggle_sort(&self, key: SortKey) {
        {
            let mut state = self.state.lock().await;
            state.view.toggle_sort(key);
            debug!("Sorting by {} {:?}", state.view.sort_key, state.view.sort_direction);
        }
        self.render().await;
    }

    /// Refetch both queries without blocking the caller
    pub async fn refresh(&self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(2);

        let tracker = self.clone();
        handles.push(tokio::spawn(async move {
            tracker.refresh_watchlist().await;
        }));

        let search = {
            let mut state = self.state.lock().await;
            if state.view.has_active_search() {
                let term = state.view.search_term.clone();
                Some((term, state.begin_search()))
            } else {
                None
            }
        };
        if let Some((term, generation)) = search {
            handles.push(self.spawn_search(term, generation, Duration::ZERO));
        }

        handles
    }

    /// Discard cached data and reload from scratch
    pub async fn retry(&self) -> Vec<JoinHandle<()>> {
        info!("Reloading market data");
        self.provider.invalidate().await;
        {
            let mut state = self.state.lock().await;
            state.watchlist = ViewStatus::Loading;
            state.search = None;
        }
        self.render().await;
        self.refresh().await
    }

    /// Snapshot of what the presenter should show
    pub async fn current_view(&self) -> MarketView {
        let state = self.state.lock().await;

        let status = match &state.watchlist {
            ViewStatus::Ready { coins, updated_at } => ViewStatus::Ready {
                coins: merge_and_sort(coins, state.visible_search(), &state.view),
                updated_at: *updated_at,
            },
            other => other.clone(),
        };

        MarketView {
            status,
            state: state.view.clone(),
            searching: state.pending_search.is_some(),
        }
    }

    async fn render(&self) {
        let view = self.current_view().await;
        self.event_handler.handle_view(&view).await;
    }

    /// Apply a single user command
    pub async fn handle_command(&self, command: Command) {
        match command {
            Command::Search(term) => {
                self.set_search_term(&term).await;
            }
            Command::Sort(key) => self.toggle_sort(key).await,
            Command::Retry => {
                self.retry().await;
            }
            Command::Refresh => {
                self.refresh().await;
            }
            Command::Quit => {}
        }
    }

    /// Event loop: periodic refresh plus user commands until `Quit`
    pub async fn run(&self, mut commands: UnboundedReceiver<Command>) -> crate::Result<()> {
        let period = self.config.refresh_interval;
        info!(
            "Tracking {} with refresh interval {:?}",
            self.config.watchlist.join(", "),
            period
        );

        self.render().await;
        self.refresh().await;

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("Scheduled refresh");
                    self.refresh().await;
                }
                command = commands.recv() => match command {
                    Some(Command::Quit) | None => {
                        info!("Stopping market tracker");
                        break;
                    }
                    Some(command) => self.handle_command(command).await,
                },
            }
        }

        Ok(())
    }
}
