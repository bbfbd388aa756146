//! Search index service configuration.

use serde::{Deserialize, Serialize};

fn default_index_name() -> String {
    "incident-small".to_string()
}

fn default_api_version() -> String {
    "2023-11-01".to_string()
}

fn default_analyzer() -> String {
    "en.microsoft".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Service URL (e.g., `https://my-search.search.windows.net`).
    #[serde(default)]
    pub endpoint: String,

    /// Admin or query key sent in the `api-key` header.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// REST API version appended to every request.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Language analyzer for the searchable `content` field.
    #[serde(default = "default_analyzer")]
    pub analyzer: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            index_name: default_index_name(),
            api_version: default_api_version(),
            analyzer: default_analyzer(),
        }
    }
}

impl SearchConfig {
    /// Check if both the endpoint and key are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = SearchConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.index_name, "incident-small");
        assert_eq!(config.analyzer, "en.microsoft");
    }

    #[test]
    fn endpoint_alone_is_not_enough() {
        let config = SearchConfig {
            endpoint: "https://svc.search.windows.net".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn configured_with_endpoint_and_key() {
        let config = SearchConfig {
            endpoint: "https://svc.search.windows.net".into(),
            api_key: "secret".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }
}
