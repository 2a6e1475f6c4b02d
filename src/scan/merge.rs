//! Merge pipeline applied to the flattened source results.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::paper::ResearchPaper;
use crate::query::{QueryPlan, parse_paper_date};

/// Characters kept in a [`dedup_key`].
pub const DEDUP_KEY_LEN: usize = 30;

/// How records whose date cannot be parsed fare against the lower date bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnparsableDatePolicy {
    /// Unparsable dates never satisfy the lower bound.
    #[default]
    Drop,
    /// Unparsable dates are kept and sorted after every dated record.
    Retain,
}

impl UnparsableDatePolicy {
    /// Parses `drop` / `retain` (case-insensitive).
    #[must_use]
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "drop" => Some(Self::Drop),
            "retain" => Some(Self::Retain),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Retain => "retain",
        }
    }
}

/// Normalized title used to detect near-duplicates across sources.
///
/// Unicode lowercase, then ASCII alphanumerics only, first [`DEDUP_KEY_LEN`] characters.
#[must_use]
pub fn dedup_key(title: &str) -> String {
    title
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .take(DEDUP_KEY_LEN)
        .collect()
}

/// Dedups, applies the date window and sorts newest first.
#[must_use]
pub fn merge_papers(
    papers: Vec<ResearchPaper>,
    plan: &QueryPlan,
    policy: UnparsableDatePolicy,
) -> Vec<ResearchPaper> {
    let fetched = papers.len();
    let mut seen = HashSet::new();
    let mut merged: Vec<ResearchPaper> = papers
        .into_iter()
        .filter(|paper| seen.insert(dedup_key(&paper.title)))
        .filter(|paper| within_window(parse_paper_date(&paper.date), plan, policy))
        .collect();

    sort_by_date_desc(&mut merged);
    debug!(fetched, kept = merged.len(), "Merged source results");
    merged
}

fn within_window(date: Option<NaiveDate>, plan: &QueryPlan, policy: UnparsableDatePolicy) -> bool {
    match date {
        Some(date) => {
            date <= plan.today
                && plan.from_date.is_none_or(|from| date >= from)
                && plan.until_date.is_none_or(|until| date <= until)
        }
        // Without a usable lower bound there is nothing to fail.
        None => plan.from_date.is_none() || policy == UnparsableDatePolicy::Retain,
    }
}

/// Stable sort by date descending; unparsable dates go last.
pub fn sort_by_date_desc(papers: &mut [ResearchPaper]) {
    papers.sort_by(|a, b| compare_dates_desc(&a.date, &b.date));
}

pub(crate) fn compare_dates_desc(a: &str, b: &str) -> Ordering {
    match (parse_paper_date(a), parse_paper_date(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::query::{DatePreset, DateRange, ScanRequest, Topic};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn plan(preset: DatePreset) -> QueryPlan {
        QueryPlan::build(&ScanRequest::new(vec![Topic::All], Vec::new(), preset), today())
    }

    fn paper(title: &str, date: &str) -> ResearchPaper {
        ResearchPaper {
            id: title.to_string(),
            title: title.to_string(),
            authors: vec!["Unknown Author".to_string()],
            abstract_text: String::new(),
            date: date.to_string(),
            source: "arXiv".to_string(),
            url: String::new(),
            tags: vec!["Finance".to_string()],
            relevance_score: 60,
            citation_count: None,
        }
    }

    fn dates(papers: &[ResearchPaper]) -> Vec<&str> {
        papers.iter().map(|p| p.date.as_str()).collect()
    }

    #[test]
    fn test_dedup_key_normalization() {
        assert_eq!(dedup_key("Deep Hedging: A Study!"), "deephedgingastudy");
        assert_eq!(
            dedup_key("An extremely long title that keeps going and going"),
            "anextremelylongtitlethatkeepsg"
        );
        assert_eq!(dedup_key("Ünïcode — only"), "ncodeonly");
    }

    #[test]
    fn test_dedup_key_folds_unicode_case_to_ascii() {
        assert_eq!(dedup_key("\u{212A}elvin waves"), "kelvinwaves");
        assert_eq!(dedup_key("KELVIN WAVES"), dedup_key("\u{212A}elvin waves"));
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let mut first = paper("Deep Hedging", "2024-06-10");
        first.source = "arXiv".to_string();
        let mut second = paper("deep-hedging.", "2024-06-12");
        second.source = "SSRN".to_string();

        let merged = merge_papers(vec![first, second], &plan(DatePreset::Month), UnparsableDatePolicy::Drop);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "arXiv");
    }

    #[test]
    fn test_shared_thirty_char_prefix_collapses() {
        let merged = merge_papers(
            vec![
                paper("Machine learning for asset pricing part one", "2024-06-10"),
                paper("Machine learning for asset pricing part two", "2024-06-11"),
            ],
            &plan(DatePreset::Month),
            UnparsableDatePolicy::Drop,
        );
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_future_dates_are_clamped() {
        let merged = merge_papers(
            vec![paper("Tomorrow", "2024-06-16"), paper("Today", "2024-06-15")],
            &plan(DatePreset::Month),
            UnparsableDatePolicy::Retain,
        );
        assert_eq!(dates(&merged), vec!["2024-06-15"]);
    }

    #[test]
    fn test_week_lower_bound() {
        let merged = merge_papers(
            vec![paper("Ten days", "2024-06-05"), paper("Three days", "2024-06-12")],
            &plan(DatePreset::Week),
            UnparsableDatePolicy::Drop,
        );
        assert_eq!(dates(&merged), vec!["2024-06-12"]);
    }

    #[test]
    fn test_sort_newest_first() {
        let merged = merge_papers(
            vec![
                paper("January", "2024-01-01"),
                paper("March", "2024-03-01"),
                paper("February", "2024-02-01"),
            ],
            &plan(DatePreset::Year),
            UnparsableDatePolicy::Drop,
        );
        assert_eq!(dates(&merged), vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    }

    #[test]
    fn test_unparsable_dates_dropped_by_default() {
        let merged = merge_papers(
            vec![paper("Undated", ""), paper("Dated", "2024-06-01")],
            &plan(DatePreset::Month),
            UnparsableDatePolicy::default(),
        );
        assert_eq!(dates(&merged), vec!["2024-06-01"]);
    }

    #[test]
    fn test_unparsable_dates_retained_sort_last() {
        let merged = merge_papers(
            vec![
                paper("Undated", "n.d."),
                paper("Older", "2024-06-01"),
                paper("Newer", "2024-06-10"),
            ],
            &plan(DatePreset::Month),
            UnparsableDatePolicy::Retain,
        );
        assert_eq!(dates(&merged), vec!["2024-06-10", "2024-06-01", "n.d."]);
    }

    #[test]
    fn test_unparsable_lower_bound_keeps_everything_dated_up_to_today() {
        let request = ScanRequest::new(vec![Topic::All], Vec::new(), DatePreset::Custom)
            .with_custom_range(DateRange::new("not-a-date", "also-bad"));
        let plan = QueryPlan::build(&request, today());
        let merged = merge_papers(
            vec![paper("Ancient", "1999-01-01"), paper("Undated", "")],
            &plan,
            UnparsableDatePolicy::Drop,
        );
        assert_eq!(dates(&merged), vec!["1999-01-01", ""]);
    }

    #[test]
    fn test_custom_range_end_bound() {
        let request = ScanRequest::new(vec![Topic::All], Vec::new(), DatePreset::Custom)
            .with_custom_range(DateRange::new("2024-01-01", "2024-03-31"));
        let plan = QueryPlan::build(&request, today());
        let merged = merge_papers(
            vec![
                paper("Before", "2023-12-31"),
                paper("Inside", "2024-02-10"),
                paper("After", "2024-04-01"),
            ],
            &plan,
            UnparsableDatePolicy::Drop,
        );
        assert_eq!(dates(&merged), vec!["2024-02-10"]);
    }

    #[test]
    fn test_policy_labels() {
        assert_eq!(UnparsableDatePolicy::from_label("Retain"), Some(UnparsableDatePolicy::Retain));
        assert_eq!(UnparsableDatePolicy::from_label(" drop "), Some(UnparsableDatePolicy::Drop));
        assert_eq!(UnparsableDatePolicy::from_label("keep"), None);
    }
}
