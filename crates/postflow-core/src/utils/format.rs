use chrono::{DateTime, Local, Utc};

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Collapse newlines and runs of whitespace so post bodies fit on one row
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format a timestamp in the local timezone, e.g. "Mar 01, 2024 10:00"
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string()
}

/// Format a price given in minor units, e.g. 1999 USD -> "$19.99"
pub fn format_price(amount_minor: i64, currency: &str) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    let (major, minor) = (abs / 100, abs % 100);
    match currency.to_ascii_uppercase().as_str() {
        "USD" => format!("{}${}.{:02}", sign, major, minor),
        "NGN" => format!("{}₦{}.{:02}", sign, major, minor),
        "EUR" => format!("{}€{}.{:02}", sign, major, minor),
        "GBP" => format!("{}£{}.{:02}", sign, major, minor),
        other => format!("{}{}.{:02} {}", sign, major, minor, other),
    }
}
