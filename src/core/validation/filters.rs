//! Reusable field filters
//!
//! These filters normalize raw form strings before validation. Each one is
//! idempotent: running it on its own output changes nothing.

use regex::Regex;
use std::sync::LazyLock;

static NON_PLATE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z0-9]").expect("plate pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Filter: trim surrounding whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: trim, then convert to uppercase
pub fn trim_uppercase(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Filter: driver name
pub fn normalize_name(value: &str) -> String {
    trim_uppercase(value)
}

/// Filter: carrier name
pub fn normalize_carrier(value: &str) -> String {
    trim_uppercase(value)
}

/// Filter: vehicle plate, uppercase with everything but `A-Z`/`0-9` removed
pub fn normalize_plate(value: &str) -> String {
    NON_PLATE_CHARS
        .replace_all(&value.to_uppercase(), "")
        .into_owned()
}

/// Filter: collection order, uppercase with all whitespace removed
pub fn normalize_order(value: &str) -> String {
    WHITESPACE
        .replace_all(&trim_uppercase(value), "")
        .into_owned()
}
