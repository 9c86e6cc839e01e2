/// Shown for missing rank or change values
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a USD price with thousands separators and 2 to 6 fraction digits
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let fixed = format!("{:.6}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < 2 {
        frac.push('0');
    }

    let sign = if price < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    format!("{}${}.{}", sign, group_thousands(int_part), frac)
}

/// Insert `,` every three digits from the right
pub fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// 24h change as a two-decimal percentage
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(value) if value.is_finite() => format!("{:.2}%", value),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_rank(rank: Option<u32>) -> String {
    rank.map(|r| r.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Truncate a string to a maximum number of characters
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
