//! Chat-completion service configuration.

use serde::{Deserialize, Serialize};

fn default_api_version() -> String {
    "2024-06-01".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    /// Resource URL (e.g., `https://my-openai.openai.azure.com`).
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    /// Model deployment name used in the request path.
    #[serde(default)]
    pub deployment: String,

    /// Must support JSON response mode for category discovery.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: String::new(),
            api_version: default_api_version(),
        }
    }
}

impl OpenAiConfig {
    /// Endpoint, key and deployment are all required.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty() && !self.deployment.is_empty()
    }
}
