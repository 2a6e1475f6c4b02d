//! Upstream paper sources.
//!
//! Each source turns a shared [`QueryPlan`] into one HTTP request against a
//! public scholarly API and normalizes the response into
//! [`ResearchPaper`]s.
//!
//! # Architecture
//!
//! - [`PaperSource`] - Async trait every adapter implements
//! - [`SourceRegistry`] - Ordered collection of configured adapters
//! - [`ArxivSource`] - arXiv Atom feed adapter
//! - [`OpenAlexSource`] - OpenAlex works adapter, one instance per venue
//!
//! # Example
//!
//! ```no_run
//! use paper_scanner_core::query::{DatePreset, QueryPlan, ScanRequest, SourceId, Topic, local_today};
//! use paper_scanner_core::source::{PaperSource, SourceConfig, build_default_source_registry};
//!
//! # async fn example() {
//! let registry = build_default_source_registry(&SourceConfig::default());
//! let request = ScanRequest::new(vec![Topic::Crypto], vec![SourceId::Arxiv], DatePreset::Month);
//! let plan = QueryPlan::build(&request, local_today());
//! for source in registry.select(&request.sources) {
//!     let papers = source.fetch_or_empty(&plan).await;
//!     println!("{}: {} papers", source.name(), papers.len());
//! }
//! # }
//! ```

mod arxiv;
mod error;
mod http_client;
mod openalex;
mod registry;
mod utils;

pub use arxiv::{ARXIV_SOURCE_LABEL, ArxivSource, DEFAULT_ARXIV_BASE_URL};
pub use error::SourceError;
pub use http_client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, configure_source_http_timeouts,
};
pub use openalex::{
    DEFAULT_OPENALEX_BASE_URL, OPENALEX_VENUES, OpenAlexSource, OpenAlexVenue,
    reconstruct_abstract,
};
pub use registry::SourceRegistry;

use async_trait::async_trait;
use tracing::warn;

use crate::paper::ResearchPaper;
use crate::query::{QueryPlan, SourceId};

/// Default number of entries requested from each source.
pub const DEFAULT_RESULTS_PER_SOURCE: usize = 30;

/// Construction-time settings shared by the default adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// `max_results` sent to arXiv.
    pub arxiv_max_results: usize,
    /// `per_page` sent to OpenAlex.
    pub openalex_per_page: usize,
    /// Relay prefix for arXiv requests; the encoded target URL is appended.
    pub cors_proxy: Option<String>,
    /// Contact address sent to OpenAlex (polite pool).
    pub mailto: Option<String>,
    pub arxiv_base_url: String,
    pub openalex_base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            arxiv_max_results: DEFAULT_RESULTS_PER_SOURCE,
            openalex_per_page: DEFAULT_RESULTS_PER_SOURCE,
            cors_proxy: None,
            mailto: None,
            arxiv_base_url: DEFAULT_ARXIV_BASE_URL.to_string(),
            openalex_base_url: DEFAULT_OPENALEX_BASE_URL.to_string(),
        }
    }
}

/// Builds the registry of every supported source.
///
/// Order is deterministic: arXiv first, then the OpenAlex venues in
/// [`SourceId::ALL`] order. A source whose client cannot be built is skipped
/// with a warning.
#[must_use]
pub fn build_default_source_registry(config: &SourceConfig) -> SourceRegistry {
    let mut registry = SourceRegistry::new();

    match ArxivSource::from_config(config) {
        Ok(source) => registry.register(Box::new(source)),
        Err(error) => warn!(
            error = %error,
            "arXiv source unavailable; continuing with remaining sources"
        ),
    }

    for venue in OPENALEX_VENUES {
        match OpenAlexSource::from_config(venue, config) {
            Ok(source) => registry.register(Box::new(source)),
            Err(error) => warn!(
                venue = venue.label,
                error = %error,
                "OpenAlex venue unavailable; continuing with remaining sources"
            ),
        }
    }

    registry
}

/// Trait implemented by every paper source.
///
/// Implementations must be `Send + Sync` so the scanner can fetch from all
/// enabled sources concurrently.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Identifier a request uses to enable this source.
    fn id(&self) -> SourceId;

    /// Human-readable name used in logs and outcome reports.
    fn name(&self) -> &str;

    /// Fetches and normalizes papers for `plan`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport, status or parse failure.
    async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<ResearchPaper>, SourceError>;

    /// Fetches papers, logging any failure and returning an empty list instead.
    async fn fetch_or_empty(&self, plan: &QueryPlan) -> Vec<ResearchPaper> {
        match self.fetch(plan).await {
            Ok(papers) => papers,
            Err(error) => {
                warn!(
                    source = self.name(),
                    error = %error,
                    "Source fetch failed; continuing without its results"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_every_source_id() {
        let registry = build_default_source_registry(&SourceConfig::default());
        assert_eq!(registry.source_count(), SourceId::ALL.len());
        for id in SourceId::ALL {
            assert_eq!(registry.select(&[id]).len(), 1, "missing source for {id}");
        }
    }

    #[test]
    fn test_default_registry_order_starts_with_arxiv() {
        let registry = build_default_source_registry(&SourceConfig::default());
        assert_eq!(registry.source_names().first().copied(), Some(ARXIV_SOURCE_LABEL));
    }

    #[test]
    fn test_default_config_values() {
        let config = SourceConfig::default();
        assert_eq!(config.arxiv_max_results, 30);
        assert_eq!(config.openalex_per_page, 30);
        assert!(config.cors_proxy.is_none());
    }
}
