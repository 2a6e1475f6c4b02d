//! Shared HTTP client construction policy for sources.
//!
//! Keeps timeout, user-agent and compression defaults identical across every
//! upstream API.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

use super::SourceError;

/// Connect timeout used until [`configure_source_http_timeouts`] overrides it.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Read timeout used until [`configure_source_http_timeouts`] overrides it.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy)]
struct SourceHttpTimeouts {
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
}

impl Default for SourceHttpTimeouts {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

static SOURCE_HTTP_TIMEOUTS: RwLock<SourceHttpTimeouts> = RwLock::new(SourceHttpTimeouts {
    connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
    read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
});

/// Configures the connect/read timeouts applied to source clients built afterwards.
///
/// Intended for CLI/runtime configuration before the registry is built.
pub fn configure_source_http_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) {
    if let Ok(mut guard) = SOURCE_HTTP_TIMEOUTS.write() {
        *guard = SourceHttpTimeouts {
            connect_timeout_secs,
            read_timeout_secs,
        };
    }
}

fn source_http_timeouts() -> SourceHttpTimeouts {
    SOURCE_HTTP_TIMEOUTS
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

/// Builds a source HTTP client using the shared policy.
///
/// `source_name` is only used in the error message.
///
/// # Errors
///
/// Returns [`SourceError::ClientBuild`] when client construction fails.
pub fn build_source_http_client(source_name: &str) -> Result<Client, SourceError> {
    let timeouts = source_http_timeouts();
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_timeout_secs))
        .timeout(Duration::from_secs(timeouts.read_timeout_secs))
        .user_agent(user_agent::default_source_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| SourceError::client_build(source_name, error))
}
