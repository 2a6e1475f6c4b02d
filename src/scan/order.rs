//! Caller-selected orderings of a merged feed.

use std::fmt;
use std::str::FromStr;

use crate::paper::ResearchPaper;
use crate::query::{QueryError, parse_paper_date};

use super::merge::compare_dates_desc;

/// Display ordering applied after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Highest relevance first, ties newest first.
    Relevance,
    /// Newest first (the scan's own order).
    #[default]
    Newest,
    /// Oldest first; undated records still go last.
    Oldest,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "relevance" | "score" => Ok(Self::Relevance),
            "newest" | "date" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            _ => Err(QueryError::UnknownSortOrder {
                value: value.to_string(),
            }),
        }
    }
}

/// Reorders `papers` in place. The sort is stable.
pub fn sort_papers(papers: &mut [ResearchPaper], order: SortOrder) {
    match order {
        SortOrder::Relevance => papers.sort_by(|a, b| {
            b.relevance_score
                .cmp(&a.relevance_score)
                .then_with(|| compare_dates_desc(&a.date, &b.date))
        }),
        SortOrder::Newest => papers.sort_by(|a, b| compare_dates_desc(&a.date, &b.date)),
        SortOrder::Oldest => papers.sort_by(|a, b| {
            let a_dated = parse_paper_date(&a.date).is_some();
            let b_dated = parse_paper_date(&b.date).is_some();
            b_dated
                .cmp(&a_dated)
                .then_with(|| compare_dates_desc(&b.date, &a.date))
        }),
    }
}
