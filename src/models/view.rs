use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::coin::Coin;

/// Minimum number of characters before a search term hits the API
pub const MIN_SEARCH_LEN: usize = 2;

/// Column the table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Rank,
    Name,
    Price,
    Change,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Rank, SortKey::Name, SortKey::Price, SortKey::Change];

    /// Column header text
    pub fn title(&self) -> &'static str {
        match self {
            SortKey::Rank => "Rank",
            SortKey::Name => "Name",
            SortKey::Price => "Price (USD)",
            SortKey::Change => "24h Change",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rank => "rank",
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Change => "change",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown sort key {:?} (expected rank, name, price or change)", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// User-controlled part of the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub search_term: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column header click: flip direction on the active key, otherwise
    /// switch keys and start ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.reversed();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn has_active_search(&self) -> bool {
        is_searchable(&self.search_term)
    }
}

pub fn is_searchable(term: &str) -> bool {
    term.chars().count() >= MIN_SEARCH_LEN
}

/// State of the watch-list query
#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    Loading,
    Failed(String),
    Ready {
        coins: Vec<Coin>,
        updated_at: DateTime<Utc>,
    },
}

/// Everything the presenter needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct MarketView {
    pub status: ViewStatus,
    pub state: ViewState,
    pub searching: bool,
}

impl MarketView {
    /// Rows to render; empty unless the watch-list is ready
    pub fn coins(&self) -> &[Coin] {
        match &self.status {
            ViewStatus::Ready { coins, .. } => coins,
            _ => &[],
        }
    }
}
