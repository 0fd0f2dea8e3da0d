//! Display-formatting helpers for the dashboard surfaces sitting in front
//! of the proxy.
//!
//! Every function is pure and total over its input domain: bad input
//! produces a rendered fallback, never an error.

use chrono::{DateTime, NaiveDate};

/// Inserts thousands separators into the integer portion of `value`'s
/// decimal representation.
///
/// The fractional part is discarded: this renders counts and whole-dollar
/// figures, and callers rely on `format_number(1234.56)` producing
/// `"1,234"`.
pub fn format_number(value: f64) -> String {
    let repr = value.to_string();
    let integer_part = repr.split('.').next().unwrap_or(&repr);
    group_thousands(integer_part)
}

fn group_thousands(integer_part: &str) -> String {
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let mut grouped = String::with_capacity(sign.len() + digits.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Scales a dollar value into the largest applicable unit (`B`, `M`, `K`)
/// with one decimal place; values below a thousand are rendered as-is.
pub fn format_currency(value: f64) -> String {
    if value >= 1e9 {
        format!("${:.1}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("${:.1}K", value / 1e3)
    } else {
        format!("${value}")
    }
}

/// Renders an ISO-like date (`2024-03-05`, optionally with an RFC 3339
/// time suffix) as a long-form English date: `March 5, 2024`.
///
/// Unparseable input yields the literal `"Invalid Date"` so the function
/// stays total; callers display it verbatim.
pub fn format_date(date: &str) -> String {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(date).map(|dt| dt.date_naive()));

    match parsed {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => "Invalid Date".to_string(),
    }
}

/// Uppercases the first character of each single-space-separated token.
pub fn capitalize(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Returns `s` unchanged when it fits in `max_length` characters,
/// otherwise its first `max_length` characters followed by `...` (so the
/// result can exceed the limit by up to three characters).
pub fn truncate(s: &str, max_length: usize) -> String {
    if s.chars().count() <= max_length {
        return s.to_string();
    }

    let mut truncated: String = s.chars().take(max_length).collect();
    truncated.push_str("...");
    truncated
}

/// Fixed-point percentage; dashboards pass 1 decimal place by default.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}
