//! Scan request types and per-source query construction.
//!
//! A [`ScanRequest`] is the filter state handed over by the surrounding
//! application: selected topics, enabled sources, a date preset and an
//! optional free-text search. [`QueryPlan::build`] turns it into the resolved
//! topic phrases and date bounds, and renders the query syntax each upstream
//! API expects.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use paper_scanner_core::query::{DatePreset, QueryPlan, ScanRequest, Topic};
//!
//! let request = ScanRequest::new(vec![Topic::Momentum], Vec::new(), DatePreset::Week);
//! let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let plan = QueryPlan::build(&request, today);
//! assert_eq!(plan.from_date, NaiveDate::from_ymd_opt(2024, 6, 8));
//! assert!(plan.arxiv_search_query().ends_with("+AND+cat:q-fin.*"));
//! ```

mod dates;
mod plan;
mod topics;

pub use dates::{DATE_FORMAT, format_date, local_today, parse_paper_date};
pub use plan::{ARXIV_CATEGORY_SCOPE, DEFAULT_TOPIC_PHRASE, QueryPlan};
pub use topics::topic_keywords;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised when parsing user-facing filter identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Topic identifier is not part of the topic table
    #[error("unknown topic '{value}'\n  Suggestion: use one of {expected}")]
    UnknownTopic {
        /// The rejected identifier
        value: String,
        /// Accepted identifiers
        expected: String,
    },

    /// Source identifier does not name a known source
    #[error("unknown source '{value}'\n  Suggestion: use one of {expected}")]
    UnknownSource {
        /// The rejected identifier
        value: String,
        /// Accepted identifiers
        expected: String,
    },

    /// Date preset identifier is not recognized
    #[error("unknown date preset '{value}'\n  Suggestion: use one of Week, Month, Quarter, Year, Custom")]
    UnknownDatePreset {
        /// The rejected identifier
        value: String,
    },

    /// Result ordering is not recognized
    #[error("unknown sort order '{value}'\n  Suggestion: use one of relevance, newest, oldest")]
    UnknownSortOrder {
        /// The rejected identifier
        value: String,
    },
}

fn normalize_identifier(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.' | '(' | ')'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Research topic filter with a curated keyword-phrase list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Wildcard: no topical narrowing.
    All,
    QuantFinance,
    Momentum,
    Crypto,
    MachineLearning,
    HighFrequencyTrading,
    Risk,
    FixedIncome,
    InternationalTax,
    TransferPricing,
    ValueChain,
    Transformation,
}

impl Topic {
    /// Every topic, in display order.
    pub const ALL: [Topic; 12] = [
        Topic::All,
        Topic::QuantFinance,
        Topic::Momentum,
        Topic::Crypto,
        Topic::MachineLearning,
        Topic::HighFrequencyTrading,
        Topic::Risk,
        Topic::FixedIncome,
        Topic::InternationalTax,
        Topic::TransferPricing,
        Topic::ValueChain,
        Topic::Transformation,
    ];

    /// Stable identifier used on the wire and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::QuantFinance => "QuantFinance",
            Self::Momentum => "Momentum",
            Self::Crypto => "Crypto",
            Self::MachineLearning => "ML",
            Self::HighFrequencyTrading => "HFT",
            Self::Risk => "Risk",
            Self::FixedIncome => "FixedIncome",
            Self::InternationalTax => "InternationalTax",
            Self::TransferPricing => "TransferPricing",
            Self::ValueChain => "ValueChain",
            Self::Transformation => "Transformation",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let topic = match normalize_identifier(value).as_str() {
            "all" => Self::All,
            "quantfinance" | "quant" => Self::QuantFinance,
            "momentum" => Self::Momentum,
            "crypto" => Self::Crypto,
            "ml" | "machinelearning" => Self::MachineLearning,
            "hft" | "highfrequencytrading" => Self::HighFrequencyTrading,
            "risk" => Self::Risk,
            "fixedincome" => Self::FixedIncome,
            "internationaltax" => Self::InternationalTax,
            "transferpricing" => Self::TransferPricing,
            "valuechain" => Self::ValueChain,
            "transformation" => Self::Transformation,
            _ => {
                return Err(QueryError::UnknownTopic {
                    value: value.to_string(),
                    expected: Self::ALL.map(Self::as_str).join(", "),
                });
            }
        };
        Ok(topic)
    }
}

/// Upstream source (or OpenAlex venue bucket) that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Arxiv,
    Ssrn,
    Bis,
    FederalReserve,
    Bls,
    Nber,
    Elsevier,
    JournalOfFinance,
    JournalOfFinancialEconomics,
    ReviewOfFinancialStudies,
    /// General "any journal" OpenAlex bucket.
    OpenAlex,
    /// Open-access works standing in for ResearchGate.
    ResearchGate,
}

impl SourceId {
    /// Every known source, in fan-out order.
    pub const ALL: [SourceId; 12] = [
        SourceId::Arxiv,
        SourceId::Ssrn,
        SourceId::Bis,
        SourceId::FederalReserve,
        SourceId::Bls,
        SourceId::Nber,
        SourceId::Elsevier,
        SourceId::JournalOfFinance,
        SourceId::JournalOfFinancialEconomics,
        SourceId::ReviewOfFinancialStudies,
        SourceId::OpenAlex,
        SourceId::ResearchGate,
    ];

    /// Stable identifier used on the wire and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arxiv => "arXiv",
            Self::Ssrn => "SSRN",
            Self::Bis => "BIS",
            Self::FederalReserve => "FED",
            Self::Bls => "BLS",
            Self::Nber => "NBER",
            Self::Elsevier => "Elsevier",
            Self::JournalOfFinance => "JF",
            Self::JournalOfFinancialEconomics => "JFE",
            Self::ReviewOfFinancialStudies => "RFS",
            Self::OpenAlex => "OpenAlex",
            Self::ResearchGate => "ResearchGate",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let source = match normalize_identifier(value).as_str() {
            "arxiv" => Self::Arxiv,
            "ssrn" => Self::Ssrn,
            "bis" => Self::Bis,
            "fed" | "federalreserve" => Self::FederalReserve,
            "bls" => Self::Bls,
            "nber" => Self::Nber,
            "elsevier" => Self::Elsevier,
            "jf" | "journaloffinance" => Self::JournalOfFinance,
            "jfe" | "journaloffinancialeconomics" => Self::JournalOfFinancialEconomics,
            "rfs" | "reviewoffinancialstudies" => Self::ReviewOfFinancialStudies,
            "openalex" | "journals" => Self::OpenAlex,
            "researchgate" => Self::ResearchGate,
            _ => {
                return Err(QueryError::UnknownSource {
                    value: value.to_string(),
                    expected: Self::ALL.map(Self::as_str).join(", "),
                });
            }
        };
        Ok(source)
    }
}

/// Publication-date window preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatePreset {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    /// Explicit range supplied through [`ScanRequest::custom_range`].
    Custom,
}

impl DatePreset {
    /// Parses a preset label, defaulting to [`DatePreset::Year`] for anything
    /// unrecognized.
    #[must_use]
    pub fn from_label_or_default(value: &str) -> Self {
        value.parse().unwrap_or(Self::Year)
    }

    /// Stable identifier used on the wire and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Quarter => "Quarter",
            Self::Year => "Year",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatePreset {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_identifier(value).as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            "custom" => Ok(Self::Custom),
            _ => Err(QueryError::UnknownDatePreset {
                value: value.to_string(),
            }),
        }
    }
}

/// Explicit `YYYY-MM-DD` range used with [`DatePreset::Custom`].
///
/// Both ends are kept as raw strings; an unparsable end simply imposes no
/// bound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Creates a range from two date strings.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Filter state for one aggregation call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanRequest {
    /// Selected topics; containing [`Topic::All`] disables topical narrowing.
    pub topics: Vec<Topic>,
    /// Enabled sources; empty means every known source.
    pub sources: Vec<SourceId>,
    pub date_preset: DatePreset,
    /// Only consulted when `date_preset` is [`DatePreset::Custom`].
    pub custom_range: Option<DateRange>,
    /// Free-text search narrowing the topic selection.
    pub search_term: Option<String>,
}

impl ScanRequest {
    /// Creates a request without custom range or search term.
    #[must_use]
    pub fn new(topics: Vec<Topic>, sources: Vec<SourceId>, date_preset: DatePreset) -> Self {
        Self {
            topics,
            sources,
            date_preset,
            custom_range: None,
            search_term: None,
        }
    }

    /// Sets the free-text search term.
    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Sets the explicit date range used by [`DatePreset::Custom`].
    #[must_use]
    pub fn with_custom_range(mut self, range: DateRange) -> Self {
        self.custom_range = Some(range);
        self
    }
}
