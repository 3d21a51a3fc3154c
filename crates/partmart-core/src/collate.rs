//! String ordering and matching helpers shared by the catalogs and filters.

use std::cmp::Ordering;

/// Orders two display strings the way a locale-aware picker would: letters
/// compare case-insensitively first, and whitespace and punctuation sort ahead
/// of digits and letters (`"Al-Zubair"` before `"Alam"`). The raw strings
/// break ties so the order is total and deterministic.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Primary weight of a character: whitespace, then punctuation and symbols,
/// then digits, then letters.
fn char_class(c: char) -> u8 {
    if c.is_whitespace() {
        0
    } else if c.is_numeric() {
        2
    } else if c.is_alphabetic() {
        3
    } else {
        1
    }
}

fn collation_key(s: &str) -> Vec<(u8, char)> {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| (char_class(c), c))
        .collect()
}

/// Sorts `items` in place using [`locale_cmp`].
pub fn sort_locale(items: &mut [String]) {
    items.sort_by(|a, b| locale_cmp(a, b));
}

/// Case-insensitive equality.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Splits a comma-separated list, trimming entries and dropping empties.
#[must_use]
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
