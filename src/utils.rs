// Utility functions
use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses an RFC 3339 timestamp into `DateTime<Utc>`.
/// Timestamps without an offset are read as UTC.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    let trimmed = date_str.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Rounds half up to the nearest integer unit.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Formats an amount as Indian rupees with lakh/crore digit grouping,
/// at most two fraction digits and no trailing zeros.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_string();
    }
    let paise = (amount.abs() * 100.0).round() as u64;
    let rupees = paise / 100;
    let fraction = paise % 100;

    let mut out = String::new();
    if amount < 0.0 && paise > 0 {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&group_indian(&rupees.to_string()));
    if fraction > 0 {
        let digits = format!("{:02}", fraction);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// "₹min – ₹max", the shape the history feed uses for `price_range`.
pub fn format_price_range(lowest: f64, highest: f64) -> String {
    format!("{} – {}", format_inr(lowest), format_inr(highest))
}

// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
