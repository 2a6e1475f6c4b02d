//! Shared User-Agent string for source HTTP clients.
//!
//! Single place for the project URL and UA format so every upstream API sees
//! the same identification.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/paper-scanner";

/// Default User-Agent for source requests (one shared format, no per-source name).
#[must_use]
pub(crate) fn default_source_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("paper-scanner/{version} (research-tool; +{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_version_and_url() {
        let ua = default_source_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL");
        assert_eq!(
            ua.strip_prefix("paper-scanner/")
                .and_then(|s| s.split(' ').next()),
            Some(env!("CARGO_PKG_VERSION")),
            "UA must contain crate version"
        );
    }

    #[test]
    fn test_user_agent_identifies_as_research_tool() {
        let ua = default_source_user_agent();
        assert!(ua.contains("research-tool"), "UA: {ua}");
    }
}
