//! Field parsers for the raw restaurant listing.

/// Returns `true` if `s` contains at least one ASCII digit.
///
/// Rating cells such as `"NEW"` or `"-"` fail this check and are dropped
/// before parsing is attempted.
pub fn has_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

/// Parses a rating cell like `"4.1/5"` into `4.1`.
///
/// Only the portion before the first `/` is considered; the denominator is
/// always the fixed scale and is discarded. Returns `None` when that portion
/// is not a number or falls outside `[0, 5]`.
pub fn parse_rating(s: &str) -> Option<f64> {
    let head = s.split('/').next()?.trim();
    let value: f64 = head.parse().ok()?;

    if (0.0..=5.0).contains(&value) {
        Some(value)
    } else {
        None
    }
}

/// Parses a cost cell like `"1,200"` into `1200.0`.
///
/// Thousands separators are stripped. Empty or non-numeric cells yield `None`.
pub fn parse_cost(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Interprets the online-order flag. `"Yes"`/`"No"` in the source data.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}
