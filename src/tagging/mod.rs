//! Keyword-based topical tagging of paper metadata.
//!
//! Tags are derived from the lowercased title and abstract by scanning a
//! fixed table of trigger phrases. The result is never empty: when no rule
//! fires, a fallback label chosen by the caller is used (or `Quant` when the
//! text mentions it).

mod rules;

use rules::TAG_RULES;
use tracing::instrument;

/// Label used when the text mentions "quant" but no rule fired.
pub const QUANT_LABEL: &str = "Quant";

/// Fallback label applied when no tag rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagFallback {
    #[default]
    Finance,
    /// Used for journal/working-paper sources.
    Research,
    /// Used for preprint servers.
    Preprint,
}

impl TagFallback {
    /// Returns the display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Finance => "Finance",
            Self::Research => "Research",
            Self::Preprint => "Pre-print",
        }
    }
}

/// Returns the deduplicated tag labels for a title/abstract pair.
///
/// Labels appear in table order. Identical input always yields the same
/// labels.
#[must_use]
#[instrument(level = "trace", skip_all, fields(title_len = title.len()))]
pub fn generate_tags(title: &str, abstract_text: &str, fallback: TagFallback) -> Vec<String> {
    let text = format!("{title} {abstract_text}").to_lowercase();

    let mut tags: Vec<String> = Vec::new();
    for rule in TAG_RULES {
        if rule.matches(&text) && !tags.iter().any(|tag| tag == rule.label) {
            tags.push(rule.label.to_string());
        }
    }

    if tags.is_empty() {
        let label = if text.contains("quant") {
            QUANT_LABEL
        } else {
            fallback.label()
        };
        tags.push(label.to_string());
    }

    tags
}
