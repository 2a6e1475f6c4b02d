//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;
use paper_scanner_core::query::{DatePreset, DateRange, ScanRequest, SourceId, Topic, parse_paper_date};
use paper_scanner_core::scan::SortOrder;

/// Scan research sources for recent quantitative-finance papers.
///
/// Queries arXiv and OpenAlex-backed venues concurrently, merges and
/// deduplicates the results, tags and scores each paper, and prints the
/// feed newest first.
#[derive(Parser, Debug)]
#[command(name = "paper-scanner")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Topic to scan for (repeatable; e.g. Crypto, ML, HFT, All)
    #[arg(short = 't', long = "topic", value_name = "TOPIC")]
    pub topics: Vec<Topic>,

    /// Source to query (repeatable; default: every source)
    #[arg(short = 's', long = "source", value_name = "SOURCE")]
    pub sources: Vec<SourceId>,

    /// Publication-date window (Week, Month, Quarter, Year, Custom)
    #[arg(short = 'r', long, default_value_t = DatePreset::Month)]
    pub range: DatePreset,

    /// Free-text search narrowing the topics
    #[arg(long, value_name = "TERMS")]
    pub search: Option<String>,

    /// Earliest publication date; implies a custom range
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date_arg)]
    pub from: Option<String>,

    /// Latest publication date; implies a custom range
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date_arg)]
    pub to: Option<String>,

    /// Result ordering (relevance, newest, oldest)
    #[arg(long, default_value_t = SortOrder::Newest)]
    pub sort: SortOrder,

    /// Print at most this many papers
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..=10_000))]
    pub limit: Option<u64>,

    /// Print the feed as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Keep papers whose date cannot be parsed (listed last)
    #[arg(long)]
    pub keep_undated: bool,

    /// Per-source deadline in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Relay prefix for arXiv requests (target URL is appended encoded)
    #[arg(long, value_name = "URL")]
    pub cors_proxy: Option<String>,

    /// Contact address sent to OpenAlex
    #[arg(long, value_name = "EMAIL")]
    pub mailto: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/paper-scanner/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Builds the scan request; `--from`/`--to` switch the range to `Custom`.
    #[must_use]
    pub fn scan_request(&self) -> ScanRequest {
        let mut request = ScanRequest::new(self.topics.clone(), self.sources.clone(), self.range);
        if self.from.is_some() || self.to.is_some() {
            request.date_preset = DatePreset::Custom;
            request = request.with_custom_range(DateRange::new(
                self.from.clone().unwrap_or_default(),
                self.to.clone().unwrap_or_default(),
            ));
        }
        if let Some(search) = &self.search {
            request = request.with_search_term(search.clone());
        }
        request
    }
}

fn parse_date_arg(value: &str) -> Result<String, String> {
    match parse_paper_date(value) {
        Some(_) if value.trim().len() == 10 => Ok(value.trim().to_string()),
        _ => Err(format!("expected a YYYY-MM-DD date, got '{value}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["paper-scanner"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.topics.is_empty());
        assert!(args.sources.is_empty());
        assert_eq!(args.range, DatePreset::Month);
        assert_eq!(args.sort, SortOrder::Newest);
        assert!(!args.json);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["paper-scanner", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_repeated_topics_and_sources() {
        let args = Args::try_parse_from([
            "paper-scanner",
            "--topic",
            "crypto",
            "-t",
            "ML",
            "--source",
            "arxiv",
            "-s",
            "journals",
        ])
        .unwrap();
        assert_eq!(args.topics, vec![Topic::Crypto, Topic::MachineLearning]);
        assert_eq!(args.sources, vec![SourceId::Arxiv, SourceId::OpenAlex]);
    }

    #[test]
    fn test_cli_invalid_topic_rejected() {
        let err = Args::try_parse_from(["paper-scanner", "--topic", "astrology"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_invalid_date_rejected() {
        let err = Args::try_parse_from(["paper-scanner", "--from", "2024-13-01"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["paper-scanner", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_timeout_range() {
        let args = Args::try_parse_from(["paper-scanner", "--timeout", "5"]).unwrap();
        assert_eq!(args.timeout, Some(5));
        let err = Args::try_parse_from(["paper-scanner", "--timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_scan_request_from_dates_implies_custom() {
        let args = Args::try_parse_from([
            "paper-scanner",
            "--range",
            "week",
            "--from",
            "2024-01-01",
            "--search",
            "carry trade",
        ])
        .unwrap();
        let request = args.scan_request();
        assert_eq!(request.date_preset, DatePreset::Custom);
        assert_eq!(
            request.custom_range,
            Some(DateRange::new("2024-01-01", ""))
        );
        assert_eq!(request.search_term.as_deref(), Some("carry trade"));
    }

    #[test]
    fn test_scan_request_keeps_preset_without_dates() {
        let args = Args::try_parse_from(["paper-scanner", "-r", "Quarter"]).unwrap();
        let request = args.scan_request();
        assert_eq!(request.date_preset, DatePreset::Quarter);
        assert!(request.custom_range.is_none());
    }
}
