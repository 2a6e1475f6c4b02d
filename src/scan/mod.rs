//! Fan-out/fan-in aggregation across paper sources.
//!
//! [`PaperScanner`] fires one task per enabled source, awaits them all,
//! and merges the results: dedup by normalized title, future-date clamp,
//! date window, newest first. A failing or slow source only shrinks the
//! result set.
//!
//! # Example
//!
//! ```no_run
//! use paper_scanner_core::query::{DatePreset, SourceId, Topic};
//! use paper_scanner_core::scan::scan_for_papers;
//!
//! # async fn example() {
//! let result = scan_for_papers(
//!     vec![Topic::Crypto],
//!     vec![SourceId::Arxiv],
//!     DatePreset::Month,
//!     None,
//!     None,
//! )
//! .await;
//! for paper in &result.papers {
//!     println!("{} {}", paper.date, paper.title);
//! }
//! # }
//! ```

mod merge;
mod order;

pub use merge::{DEDUP_KEY_LEN, UnparsableDatePolicy, dedup_key, merge_papers, sort_by_date_desc};
pub use order::{SortOrder, sort_papers};

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::paper::ResearchPaper;
use crate::query::{DatePreset, DateRange, QueryPlan, ScanRequest, SourceId, Topic, local_today};
use crate::source::{PaperSource, SourceConfig, SourceError, SourceRegistry, build_default_source_registry};

/// Default deadline for a single source fetch.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(20);

/// Aggregation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Per-source deadline; exceeding it counts as a source failure.
    pub source_timeout: Duration,
    pub unparsable_dates: UnparsableDatePolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            unparsable_dates: UnparsableDatePolicy::default(),
        }
    }
}

/// What one source contributed to a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOutcome {
    pub source: String,
    /// Papers returned before merging.
    pub fetched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Merged feed plus per-source diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub papers: Vec<ResearchPaper>,
    pub source_outcomes: Vec<SourceOutcome>,
}

impl ScanResult {
    /// True when at least one source was queried and every one failed.
    #[must_use]
    pub fn all_sources_failed(&self) -> bool {
        !self.source_outcomes.is_empty() && self.source_outcomes.iter().all(SourceOutcome::is_failure)
    }

    /// Number of sources that failed.
    #[must_use]
    pub fn failed_source_count(&self) -> usize {
        self.source_outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

/// Aggregates papers from the sources in a [`SourceRegistry`].
///
/// Stateless per call: concurrent scans are safe, each one a fresh burst of
/// requests.
#[derive(Debug)]
pub struct PaperScanner {
    registry: SourceRegistry,
    options: ScanOptions,
}

impl PaperScanner {
    #[must_use]
    pub fn new(registry: SourceRegistry, options: ScanOptions) -> Self {
        Self { registry, options }
    }

    /// Scanner over every production source with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            build_default_source_registry(&SourceConfig::default()),
            ScanOptions::default(),
        )
    }

    #[must_use]
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Runs one scan relative to the local calendar date.
    pub async fn scan(&self, request: &ScanRequest) -> ScanResult {
        self.scan_on(request, local_today()).await
    }

    /// Runs one scan relative to `today`.
    ///
    /// Never fails: source errors, timeouts and panicked fetch tasks are
    /// logged and reported in [`ScanResult::source_outcomes`].
    #[tracing::instrument(skip(self, request), fields(sources = request.sources.len(), preset = %request.date_preset))]
    pub async fn scan_on(&self, request: &ScanRequest, today: NaiveDate) -> ScanResult {
        let plan = Arc::new(QueryPlan::build(request, today));
        let sources = self.registry.select(&request.sources);
        if sources.is_empty() {
            warn!("No registered source matches the request");
        }

        let mut handles = Vec::with_capacity(sources.len());
        for source in sources {
            let name = source.name().to_string();
            let plan = Arc::clone(&plan);
            let deadline = self.options.source_timeout;
            debug!(source = %name, "dispatching fetch");
            handles.push((
                name,
                tokio::spawn(async move { fetch_with_deadline(source, &plan, deadline).await }),
            ));
        }

        let mut fetched = Vec::new();
        let mut source_outcomes = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(SourceError::network(&name, join_error)),
            };
            match result {
                Ok(papers) => {
                    debug!(source = %name, count = papers.len(), "source fetch completed");
                    source_outcomes.push(SourceOutcome {
                        source: name,
                        fetched: papers.len(),
                        error: None,
                    });
                    fetched.extend(papers);
                }
                Err(error) => {
                    warn!(
                        source = %name,
                        error = %error,
                        "Source fetch failed; continuing without its results"
                    );
                    source_outcomes.push(SourceOutcome {
                        source: name,
                        fetched: 0,
                        error: Some(error.to_string()),
                    });
                }
            }
        }

        let papers = merge_papers(fetched, &plan, self.options.unparsable_dates);
        let result = ScanResult {
            papers,
            source_outcomes,
        };
        info!(
            papers = result.papers.len(),
            failed_sources = result.failed_source_count(),
            "scan complete"
        );
        result
    }
}

async fn fetch_with_deadline(
    source: Arc<dyn PaperSource>,
    plan: &QueryPlan,
    deadline: Duration,
) -> Result<Vec<ResearchPaper>, SourceError> {
    match tokio::time::timeout(deadline, source.fetch(plan)).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::timeout(source.name(), deadline.as_secs())),
    }
}

/// Scans every requested source with production defaults.
///
/// `sources` empty means every known source; `custom_range` is only used
/// with [`DatePreset::Custom`]; a blank `search_term` is ignored.
pub async fn scan_for_papers(
    topics: Vec<Topic>,
    sources: Vec<SourceId>,
    date_preset: DatePreset,
    custom_range: Option<DateRange>,
    search_term: Option<String>,
) -> ScanResult {
    let request = ScanRequest {
        topics,
        sources,
        date_preset,
        custom_range,
        search_term,
    };
    PaperScanner::with_defaults().scan(&request).await
}
