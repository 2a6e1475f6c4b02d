//! Error types for source fetch operations.
//!
//! Every variant names the source and says what went wrong, plus a fix hint
//! where one exists. The scanner never propagates these: they are logged and
//! the failing source contributes no papers.

use thiserror::Error;

/// Errors that can occur while fetching or parsing one source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Request could not be sent or the body could not be read
    #[error("cannot reach {source_name}: {message}\n  Suggestion: Check your network connection or proxy settings")]
    Network {
        /// Source that failed
        source_name: String,
        /// Transport error description
        message: String,
    },

    /// Upstream answered with a non-success status
    #[error("{source_name} returned HTTP {status}\n  Suggestion: {suggestion}")]
    HttpStatus {
        /// Source that failed
        source_name: String,
        /// HTTP status code
        status: u16,
        /// How to fix the issue
        suggestion: String,
    },

    /// Body was not the expected XML/JSON shape
    #[error("unexpected {source_name} response format: {message}")]
    Parse {
        /// Source that failed
        source_name: String,
        /// Parser error description
        message: String,
    },

    /// Source exceeded its per-scan deadline
    #[error("{source_name} did not respond within {timeout_secs}s")]
    Timeout {
        /// Source that failed
        source_name: String,
        /// Deadline that was exceeded
        timeout_secs: u64,
    },

    /// HTTP client for the source could not be constructed
    #[error("cannot initialize {source_name} client: {message}")]
    ClientBuild {
        /// Source that failed
        source_name: String,
        /// Builder error description
        message: String,
    },
}

impl SourceError {
    /// Creates a `Network` error.
    #[must_use]
    pub fn network(source_name: &str, message: impl ToString) -> Self {
        Self::Network {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an `HttpStatus` error with a status-specific suggestion.
    #[must_use]
    pub fn http_status(source_name: &str, status: u16) -> Self {
        let suggestion = match status {
            429 => "Rate limit exceeded. Try again in a few seconds.".to_string(),
            s if s >= 500 => format!("{source_name} is unavailable. Try again later."),
            404 => "Check the configured base URL.".to_string(),
            _ => "Check the request filters.".to_string(),
        };
        Self::HttpStatus {
            source_name: source_name.to_string(),
            status,
            suggestion,
        }
    }

    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(source_name: &str, message: impl ToString) -> Self {
        Self::Parse {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a `Timeout` error.
    #[must_use]
    pub fn timeout(source_name: &str, timeout_secs: u64) -> Self {
        Self::Timeout {
            source_name: source_name.to_string(),
            timeout_secs,
        }
    }

    /// Creates a `ClientBuild` error.
    #[must_use]
    pub fn client_build(source_name: &str, message: impl ToString) -> Self {
        Self::ClientBuild {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }

    /// Returns the name of the source this error belongs to.
    #[must_use]
    pub fn source_name(&self) -> &str {
        match self {
            Self::Network { source_name, .. }
            | Self::HttpStatus { source_name, .. }
            | Self::Parse { source_name, .. }
            | Self::Timeout { source_name, .. }
            | Self::ClientBuild { source_name, .. } => source_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_suggestions() {
        let msg = SourceError::http_status("OpenAlex", 429).to_string();
        assert!(msg.contains("HTTP 429"));
        assert!(msg.contains("Rate limit"));

        let msg = SourceError::http_status("arXiv", 503).to_string();
        assert!(msg.contains("arXiv is unavailable"));
    }

    #[test]
    fn test_network_error_message() {
        let err = SourceError::network("arXiv", "connection refused");
        assert_eq!(err.source_name(), "arXiv");
        assert!(err.to_string().contains("connection refused"));
        assert!(err.to_string().contains("Suggestion"));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = SourceError::timeout("SSRN", 20);
        assert_eq!(err.to_string(), "SSRN did not respond within 20s");
    }
}
