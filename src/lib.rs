//! Paper Scanner Core Library
//!
//! This library aggregates recent research papers from public scholarly APIs,
//! tags and scores them, and returns one merged, deduplicated feed.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`paper`] - The normalized [`ResearchPaper`] record
//! - [`query`] - Topics, sources, date presets and per-source query syntax
//! - [`tagging`] - Keyword-based topical labels
//! - [`scoring`] - Bounded heuristic relevance score
//! - [`source`] - arXiv and OpenAlex adapters behind the [`PaperSource`] trait
//! - [`scan`] - Concurrent fan-out, dedup, date window and sort

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod paper;
pub mod query;
pub mod scan;
pub mod scoring;
pub mod source;
pub mod tagging;
mod user_agent;

// Re-export commonly used types
pub use paper::ResearchPaper;
pub use query::{DatePreset, DateRange, QueryError, QueryPlan, ScanRequest, SourceId, Topic};
pub use scan::{
    PaperScanner, ScanOptions, ScanResult, SortOrder, SourceOutcome, UnparsableDatePolicy,
    scan_for_papers, sort_papers,
};
pub use source::{PaperSource, SourceConfig, SourceError, SourceRegistry};
