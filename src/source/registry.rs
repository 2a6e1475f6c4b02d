//! Source registry with selection by identifier.
//!
//! The [`SourceRegistry`] owns the configured adapters and hands the scanner
//! the subset a request enabled, in registration order.

use std::sync::Arc;

use tracing::debug;

use crate::query::SourceId;

use super::PaperSource;

/// An ordered collection of paper sources.
pub struct SourceRegistry {
    sources: Vec<Arc<dyn PaperSource>>,
}

impl SourceRegistry {
    /// Creates an empty source registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Registers a source with the registry.
    #[tracing::instrument(skip(self, source), fields(source_name))]
    pub fn register(&mut self, source: Box<dyn PaperSource>) {
        tracing::Span::current().record("source_name", source.name());
        debug!(name = source.name(), id = %source.id(), "Registering source");
        self.sources.push(Arc::from(source));
    }

    /// Returns the number of registered sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no sources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns the sources enabled by `enabled`, in registration order.
    ///
    /// An empty selection enables every registered source. Handles are shared
    /// so each fetch can run on its own task.
    #[must_use]
    pub fn select(&self, enabled: &[SourceId]) -> Vec<Arc<dyn PaperSource>> {
        self.sources
            .iter()
            .filter(|source| enabled.is_empty() || enabled.contains(&source.id()))
            .cloned()
            .collect()
    }

    /// Returns the names of all registered sources.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.source_names())
            .finish()
    }
}
