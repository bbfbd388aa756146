//! Key-phrase extraction service configuration.

use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextAnalyticsConfig {
    /// Language resource URL (e.g., `https://my-lang.cognitiveservices.azure.com`).
    #[serde(default)]
    pub endpoint: String,

    /// Subscription key sent in the `Ocp-Apim-Subscription-Key` header.
    #[serde(default)]
    pub api_key: String,

    /// Language hint attached to every submitted text.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for TextAnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            language: default_language(),
        }
    }
}

impl TextAnalyticsConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TextAnalyticsConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.language, "en");
    }
}
