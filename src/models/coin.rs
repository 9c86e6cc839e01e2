use serde::{Deserialize, Deserializer, Serialize};

/// Market record for a single asset, as returned by `/coins/markets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "price_or_zero")]
    pub current_price: f64,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

impl Coin {
    /// Create a coin with no change or rank data
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>, current_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: String::new(),
            current_price,
            price_change_percentage_24h: None,
            market_cap_rank: None,
        }
    }

    pub fn with_change(mut self, change: f64) -> Self {
        self.price_change_percentage_24h = Some(change);
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.market_cap_rank = Some(rank);
        self
    }

    /// 24h change used for ordering (missing counts as zero)
    pub fn change_or_zero(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    /// Market cap rank used for ordering (missing counts as zero)
    pub fn rank_or_zero(&self) -> u32 {
        self.market_cap_rank.unwrap_or(0)
    }
}

// CoinGecko sends `null` prices for delisted coins.
fn price_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Lightweight search hit; carries no price until resolved through `/coins/markets`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchMatch {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// Body of `/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchMatch>,
}
