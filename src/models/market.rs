use std::cmp::Ordering;
use std::collections::HashSet;

use super::coin::Coin;
use super::view::{SortDirection, SortKey, ViewState};

type Comparator = fn(&Coin, &Coin) -> Ordering;

impl SortKey {
    /// Ascending comparator for this column
    pub fn comparator(&self) -> Comparator {
        match self {
            SortKey::Rank => compare_rank,
            SortKey::Name => compare_name,
            SortKey::Price => compare_price,
            SortKey::Change => compare_change,
        }
    }
}

fn compare_rank(a: &Coin, b: &Coin) -> Ordering {
    a.rank_or_zero().cmp(&b.rank_or_zero())
}

// Accent- and case-insensitive first so "Éclair" sorts with the e's, then
// the lowercase and raw text to keep the order total.
fn compare_name(a: &Coin, b: &Coin) -> Ordering {
    let (a_lower, b_lower) = (a.name.to_lowercase(), b.name.to_lowercase());
    collation_key(&a_lower)
        .cmp(collation_key(&b_lower))
        .then_with(|| a_lower.cmp(&b_lower))
        .then_with(|| a.name.cmp(&b.name))
}

fn collation_key(lower: &str) -> impl Iterator<Item = char> + '_ {
    lower.chars().flat_map(fold_char)
}

/// Base letters for the accented Latin letters found in coin names.
/// Other scripts compare by code point.
fn fold_char(c: char) -> FoldedChar {
    let folded: &'static str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return FoldedChar::Kept(Some(c)),
    };
    FoldedChar::Folded(folded.chars())
}

enum FoldedChar {
    Kept(Option<char>),
    Folded(std::str::Chars<'static>),
}

impl Iterator for FoldedChar {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            FoldedChar::Kept(c) => c.take(),
            FoldedChar::Folded(chars) => chars.next(),
        }
    }
}

fn compare_price(a: &Coin, b: &Coin) -> Ordering {
    a.current_price.total_cmp(&b.current_price)
}

fn compare_change(a: &Coin, b: &Coin) -> Ordering {
    a.change_or_zero().total_cmp(&b.change_or_zero())
}

/// Watch-list first in its original order, then search hits not already shown
pub fn merge_coins(watchlist: &[Coin], search: &[Coin]) -> Vec<Coin> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(watchlist.len() + search.len());
    let mut merged = Vec::with_capacity(watchlist.len() + search.len());

    for coin in watchlist.iter().chain(search) {
        if seen.insert(coin.id.as_str()) {
            merged.push(coin.clone());
        }
    }

    merged
}

/// Stable sort; equal keys keep their input order in both directions
pub fn sort_coins(coins: &mut [Coin], key: SortKey, direction: SortDirection) {
    let compare = key.comparator();
    match direction {
        SortDirection::Ascending => coins.sort_by(compare),
        SortDirection::Descending => coins.sort_by(|a, b| compare(b, a)),
    }
}

pub fn merge_and_sort(watchlist: &[Coin], search: &[Coin], state: &ViewState) -> Vec<Coin> {
    let mut coins = merge_coins(watchlist, search);
    sort_coins(&mut coins, state.sort_key, state.sort_direction);
    coins
}
