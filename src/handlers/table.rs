use chrono::Local;

use crate::models::coin::Coin;
use crate::models::view::{MarketView, SortKey, ViewState, ViewStatus};
use crate::utils::helper::{format_change, format_price, format_rank, truncate_string};

pub const TITLE: &str = "Crypto Price Tracker";
pub const SUBTITLE: &str = "Live crypto currency prices powered by CoinGecko API";
pub const LOADING_TITLE: &str = "Loading crypto currency price data...";
pub const LOADING_HINT: &str = "Please wait while we fetch the latest prices";
pub const ERROR_TITLE: &str = "Error Loading Data";
pub const ERROR_FALLBACK: &str =
    "There was an error fetching crypto currency price data. Please try again later.";
pub const RETRY_HINT: &str = "Type :retry to reload";
pub const NO_RESULTS: &str = "No coins found";
pub const SEARCHING: &str = "Searching...";

const RANK_WIDTH: usize = 8;
const NAME_WIDTH: usize = 32;
const PRICE_WIDTH: usize = 20;
const CHANGE_WIDTH: usize = 14;
const TABLE_WIDTH: usize = RANK_WIDTH + NAME_WIDTH + PRICE_WIDTH + CHANGE_WIDTH;

/// Lay out one dashboard frame as plain text lines
pub fn render_lines(view: &MarketView) -> Vec<String> {
    let mut lines = vec![TITLE.to_string(), SUBTITLE.to_string(), String::new()];

    match &view.status {
        ViewStatus::Loading => {
            lines.push(LOADING_TITLE.to_string());
            lines.push(LOADING_HINT.to_string());
        }
        ViewStatus::Failed(message) => {
            lines.push(format!("⚠ {}", ERROR_TITLE));
            let message = if message.is_empty() { ERROR_FALLBACK } else { message.as_str() };
            lines.push(message.to_string());
            lines.push(RETRY_HINT.to_string());
        }
        ViewStatus::Ready { coins, updated_at } => {
            let updated = updated_at.with_timezone(&Local).format("%H:%M:%S").to_string();
            let status = if view.searching { SEARCHING } else { "" };
            lines.push(
                format!("Last updated: {:<width$}{}", updated, status, width = TABLE_WIDTH - 22)
                    .trim_end()
                    .to_string(),
            );
            lines.push(header_row(&view.state));
            lines.push("-".repeat(TABLE_WIDTH));

            if coins.is_empty() {
                lines.push(format!("{:^width$}", NO_RESULTS, width = TABLE_WIDTH).trim_end().to_string());
            } else {
                lines.extend(coins.iter().map(coin_row));
            }
        }
    }

    lines
}

fn header_cell(state: &ViewState, key: SortKey) -> String {
    if state.sort_key == key {
        format!("{} {}", key.title(), state.sort_direction.arrow())
    } else {
        key.title().to_string()
    }
}

/// Column headers with the active key's arrow
pub fn header_row(state: &ViewState) -> String {
    format!(
        "{:<rw$}{:<nw$}{:<pw$}{}",
        header_cell(state, SortKey::Rank),
        header_cell(state, SortKey::Name),
        header_cell(state, SortKey::Price),
        header_cell(state, SortKey::Change),
        rw = RANK_WIDTH,
        nw = NAME_WIDTH,
        pw = PRICE_WIDTH,
    )
}

/// One table row
pub fn coin_row(coin: &Coin) -> String {
    let name = truncate_string(
        &format!("{} ({})", coin.name, coin.symbol.to_uppercase()),
        NAME_WIDTH - 2,
    );

    let change = match coin.price_change_percentage_24h {
        Some(value) if value >= 0.0 => format!("▲ {}", format_change(Some(value))),
        Some(value) => format!("▼ {}", format_change(Some(value))),
        None => format_change(None),
    };

    format!(
        "{:<rw$}{:<nw$}{:<pw$}{}",
        format_rank(coin.market_cap_rank),
        name,
        format_price(coin.current_price),
        change,
        rw = RANK_WIDTH,
        nw = NAME_WIDTH,
        pw = PRICE_WIDTH,
    )
}
