//! Text normalization for values read off the page.

use regex::Regex;
use std::sync::OnceLock;

/// Leading non-word characters (icons, arrows) before a menu label
const LEADING_NON_WORD: &str = r"(?s)^[^\w]*(.*)";

#[allow(clippy::unwrap_used)] // constant pattern
fn leading_non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LEADING_NON_WORD).unwrap())
}

/// Strip icon glyphs and whitespace from a submenu entry
///
/// `"\u{1F4C4} HTML\n"` becomes `"HTML"`.
#[must_use]
pub fn clean_menu_label(raw: &str) -> String {
    let trimmed = raw.trim();
    leading_non_word()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str())
        .trim()
        .to_string()
}

/// Optional sign, digits with an optional fraction, optional exponent
const LEADING_NUMBER: &str = r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?";

#[allow(clippy::unwrap_used)] // constant pattern
fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LEADING_NUMBER).unwrap())
}

/// Parse a currency string such as `"$100.00"` or `"-$50.00"`
///
/// Like `parseFloat`, the leading number is read and anything after it is
/// ignored; text without a leading number yields 0. Thousands separators
/// are dropped first, so `"$1,250.50"` is 1250.5 rather than 1.
#[must_use]
pub fn parse_currency(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    leading_number()
        .find(cleaned.trim_start())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Round to two decimal places
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
