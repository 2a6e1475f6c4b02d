//! CLI output formatting and display helpers.

use anyhow::{Context, Result};
use paper_scanner_core::ResearchPaper;
use paper_scanner_core::scan::ScanResult;

const DATE_COLUMN: usize = 10;
const SCORE_COLUMN: usize = 3;
const SOURCE_COLUMN: usize = 16;

/// Returns terminal width from COLUMNS, or 100 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40)
        .unwrap_or(100)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

fn pad_to_width(text: &str, width: usize) -> String {
    let truncated = truncate_to_width(text, width);
    let padding = width.saturating_sub(truncated.chars().count());
    format!("{truncated}{}", " ".repeat(padding))
}

/// Renders one table row per paper: date, score, source, title, tags.
pub fn render_table(papers: &[ResearchPaper], width: usize) -> Vec<String> {
    let fixed = DATE_COLUMN + SCORE_COLUMN + SOURCE_COLUMN + 6;
    let text_width = width.saturating_sub(fixed).max(10);

    let mut lines = Vec::with_capacity(papers.len() + 1);
    lines.push(format!(
        "{}  {}  {}  TITLE",
        pad_to_width("DATE", DATE_COLUMN),
        pad_to_width("REL", SCORE_COLUMN),
        pad_to_width("SOURCE", SOURCE_COLUMN),
    ));
    for paper in papers {
        let text = format!("{} [{}]", paper.title, paper.tags.join(", "));
        let date = if paper.date.is_empty() { "n.d." } else { paper.date.as_str() };
        lines.push(format!(
            "{}  {:>width$}  {}  {}",
            pad_to_width(date, DATE_COLUMN),
            paper.relevance_score,
            pad_to_width(&paper.source, SOURCE_COLUMN),
            truncate_to_width(&text, text_width),
            width = SCORE_COLUMN,
        ));
    }
    lines
}

/// One-line summary of a scan.
pub fn scan_summary(result: &ScanResult) -> String {
    let queried = result.source_outcomes.len();
    let failed = result.failed_source_count();
    let mut summary = format!(
        "Found {} papers from {} source{}",
        result.papers.len(),
        queried,
        if queried == 1 { "" } else { "s" }
    );
    if failed > 0 {
        let names: Vec<&str> = result
            .source_outcomes
            .iter()
            .filter(|outcome| outcome.is_failure())
            .map(|outcome| outcome.source.as_str())
            .collect();
        summary.push_str(&format!(" ({failed} failed: {})", names.join(", ")));
    }
    summary
}

/// Serializes the result as pretty JSON.
pub fn render_json(result: &ScanResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize scan result")
}
