//! Canonical normalized paper record shared by every source adapter.

use serde::{Deserialize, Serialize};

/// Author placeholder used when a source reports no authors.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Maximum number of author names kept per record.
pub const MAX_DISPLAY_AUTHORS: usize = 3;

/// Lowest relevance score a record can carry.
pub const MIN_RELEVANCE: u8 = 60;

/// Highest relevance score a record can carry.
pub const MAX_RELEVANCE: u8 = 99;

/// A research paper normalized from one upstream source.
///
/// Records are built once per scan and never mutated afterwards. Serialized
/// field names follow the camelCase shape consumed by the feed UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPaper {
    /// Source-provided identifier, or a generated fallback unique within one scan.
    pub id: String,
    /// Paper title; also the basis of the dedup key.
    pub title: String,
    /// Up to [`MAX_DISPLAY_AUTHORS`] display names, never empty.
    pub authors: Vec<String>,
    /// Abstract text, or a placeholder sentence when the source has none.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Publication date as `YYYY-MM-DD`; may be empty or unparsable.
    pub date: String,
    /// Normalized venue label (e.g. `arXiv`, `SSRN`, `BIS Working Papers`).
    pub source: String,
    /// Landing page or DOI link; empty when none is known.
    pub url: String,
    /// Topical labels, never empty.
    pub tags: Vec<String>,
    /// Heuristic relevance in `MIN_RELEVANCE..=MAX_RELEVANCE`.
    pub relevance_score: u8,
    /// Citation count when the source reports one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub citation_count: Option<u32>,
}

/// Keeps at most [`MAX_DISPLAY_AUTHORS`] non-blank names, falling back to
/// [`UNKNOWN_AUTHOR`].
#[must_use]
pub fn display_authors<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let authors: Vec<String> = names
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .take(MAX_DISPLAY_AUTHORS)
        .collect();

    if authors.is_empty() {
        vec![UNKNOWN_AUTHOR.to_string()]
    } else {
        authors
    }
}
