//! Shared text helpers for source adapters.

use std::sync::LazyLock;

use regex::Regex;

/// Compiles a regex at static init; panics on invalid pattern.
pub fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Line breaks plus the indentation around them, as found in Atom text nodes.
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\s*[\r\n]+\s*"));

/// Collapses embedded line breaks to single spaces and trims the result.
#[must_use]
pub fn collapse_line_breaks(value: &str) -> String {
    LINE_BREAK_RE.replace_all(value, " ").trim().to_string()
}

/// Returns the trimmed value, or `None` when it is missing or blank.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
