//! Resolved query state and per-source query syntax.

use chrono::NaiveDate;

use super::dates::format_date;
use super::topics::topic_keywords;
use super::{ScanRequest, Topic};

/// Category scope applied to every arXiv query.
pub const ARXIV_CATEGORY_SCOPE: &str = "cat:q-fin.*";

/// Phrase used when nothing narrows the selection and `All` was not chosen.
pub const DEFAULT_TOPIC_PHRASE: &str = "quantitative finance";

/// Resolved filter state for one scan, shared read-only by every source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Union of the selected topics' phrases, first occurrence order.
    pub topic_phrases: Vec<String>,
    /// Trimmed, non-empty free-text search.
    pub search_term: Option<String>,
    /// Inclusive lower publication-date bound.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper publication-date bound (custom ranges only).
    pub until_date: Option<NaiveDate>,
    /// Reference "today" for recency scoring and the future-date clamp.
    pub today: NaiveDate,
}

impl QueryPlan {
    /// Resolves a request against a fixed `today`.
    #[must_use]
    #[tracing::instrument(skip(request), fields(topics = request.topics.len(), preset = %request.date_preset))]
    pub fn build(request: &ScanRequest, today: NaiveDate) -> Self {
        let search_term = request
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(ToString::to_string);

        let topic_phrases = collect_topic_phrases(&request.topics, search_term.is_some());
        let custom_range = request.custom_range.as_ref();

        Self {
            topic_phrases,
            search_term,
            from_date: request.date_preset.lower_bound(today, custom_range),
            until_date: request.date_preset.upper_bound(custom_range),
            today,
        }
    }

    /// Returns true when neither topic phrases nor a search term constrain the query.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.topic_phrases.is_empty() && self.search_term.is_none()
    }

    /// Renders the arXiv `search_query` expression.
    ///
    /// Topic phrases become `all:"phrase"` terms joined with `+OR+`; a search
    /// term is ANDed on; the result is always scoped to the q-fin archive.
    #[must_use]
    pub fn arxiv_search_query(&self) -> String {
        let mut main = String::new();

        if !self.topic_phrases.is_empty() {
            let joined = self
                .topic_phrases
                .iter()
                .map(|phrase| format!("all:\"{}\"", urlencoding::encode(phrase)))
                .collect::<Vec<_>>()
                .join("+OR+");
            main = format!("({joined})");
        }

        if let Some(term) = &self.search_term {
            let part = format!("all:{}", urlencoding::encode(term));
            main = if main.is_empty() {
                part
            } else {
                format!("{main}+AND+{part}")
            };
        }

        if main.is_empty() {
            ARXIV_CATEGORY_SCOPE.to_string()
        } else {
            format!("{main}+AND+{ARXIV_CATEGORY_SCOPE}")
        }
    }

    /// Renders the OpenAlex `default.search` filter clauses, if any.
    ///
    /// Topic phrases are quoted and joined with `|` (OR); a search term is a
    /// second clause joined with `,` (AND).
    #[must_use]
    pub fn openalex_search_filter(&self) -> Option<String> {
        let mut clauses = Vec::new();

        if !self.topic_phrases.is_empty() {
            let joined = self
                .topic_phrases
                .iter()
                .map(|phrase| format!("\"{phrase}\""))
                .collect::<Vec<_>>()
                .join("|");
            clauses.push(format!("default.search:{}", urlencoding::encode(&joined)));
        }

        if let Some(term) = self.search_term.as_deref().and_then(openalex_free_text) {
            clauses.push(format!("default.search:{}", urlencoding::encode(&term)));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(","))
        }
    }

    /// Renders the complete OpenAlex `filter` parameter for one venue.
    ///
    /// `fallback_search` is substituted when the plan has no search clauses
    /// (catch-all venues use it to stay on-domain).
    #[must_use]
    pub fn openalex_filter(&self, venue_filter: Option<&str>, fallback_search: Option<&str>) -> String {
        let mut clauses = Vec::new();

        match self.openalex_search_filter() {
            Some(search) => clauses.push(search),
            None => {
                if let Some(fallback) = fallback_search {
                    clauses.push(format!("default.search:{}", urlencoding::encode(fallback)));
                }
            }
        }

        if let Some(venue) = venue_filter {
            clauses.push(venue.to_string());
        }
        if let Some(from) = self.from_date {
            clauses.push(format!("from_publication_date:{}", format_date(from)));
        }
        if let Some(until) = self.until_date {
            clauses.push(format!("to_publication_date:{}", format_date(until)));
        }

        clauses.join(",")
    }
}

/// Free text safe inside one OpenAlex filter value.
///
/// `,` and `|` separate filter clauses even when percent-encoded, so they
/// become spaces. `None` when nothing searchable is left.
fn openalex_free_text(term: &str) -> Option<String> {
    let cleaned = term
        .split([',', '|'])
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

fn collect_topic_phrases(topics: &[Topic], has_search: bool) -> Vec<String> {
    if topics.contains(&Topic::All) {
        return Vec::new();
    }

    let mut phrases: Vec<String> = Vec::new();
    for phrase in topics.iter().flat_map(|topic| topic_keywords(*topic)) {
        if !phrases.iter().any(|existing| existing == phrase) {
            phrases.push((*phrase).to_string());
        }
    }

    if phrases.is_empty() && !has_search {
        phrases.push(DEFAULT_TOPIC_PHRASE.to_string());
    }
    phrases
}
