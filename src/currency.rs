//! Free-form price parsing and currency conversion.
//!
//! Upstream order feeds carry prices in several conventions (`"$12.50"`,
//! `"12,50 EUR"`, `"9¢50"`, `"9$50"`). [`clean_price()`] reduces them to a
//! plain amount through an ordered list of rewrite rules; [`currency_factor()`]
//! inspects the *original* string for a Euro marker, because the cleanup
//! destroys it.

use std::sync::LazyLock;

use regex::Regex;

/// Fixed EUR -> USD multiplier applied when converting amounts to the
/// canonical currency.
pub const EUR_TO_USD: f64 = 1.2;

// A currency glyph wedged between integer and fractional digits acts as the
// decimal separator: `9¢50`, `9$50`, `9€50` all mean nine-and-fifty.
static GLYPH_DECIMAL_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)[¢$€](\d)").expect("hard-coded regex"));

static CURRENCY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)usd|eur|[$€¢]").expect("hard-coded regex"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("hard-coded regex"));

// Applied in order; the glyph-as-separator rewrite must run before generic
// token stripping, which would otherwise erase the separator.
static CLEANUP_RULES: &[fn(String) -> String] = &[
    collapse_separators,
    rewrite_glyph_decimal_marks,
    strip_currency_tokens,
];

/// Parses a free-form price string into a plain amount.
///
/// Returns `None` when the input is absent or contains no recoverable numeric
/// substring; parsing never fails.
pub fn clean_price(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let cleaned = CLEANUP_RULES
        .iter()
        .fold(raw.to_string(), |value, rule| rule(value));
    NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Returns the multiplier that converts the price in `raw` to the canonical
/// currency.
///
/// Decided from the uncleaned source string: a `€` glyph or `eur` token
/// (any case) selects the EUR rate, everything else is already canonical.
pub fn currency_factor(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 1.0;
    };
    let lowered = raw.to_lowercase();
    if lowered.contains('€') || lowered.contains("eur") {
        EUR_TO_USD
    } else {
        1.0
    }
}

fn collapse_separators(value: String) -> String {
    value
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

fn rewrite_glyph_decimal_marks(value: String) -> String {
    GLYPH_DECIMAL_MARK.replace_all(&value, "$1.$2").into_owned()
}

fn strip_currency_tokens(value: String) -> String {
    CURRENCY_TOKEN.replace_all(&value, "").into_owned()
}
