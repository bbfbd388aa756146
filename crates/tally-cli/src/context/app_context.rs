use std::sync::OnceLock;
use std::time::Duration;

use tally_config::TallyConfig;
use tally_services::{ChatClient, KeyPhraseClient, RetryPolicy, SearchClient};

/// Configuration plus the service clients built from it.
///
/// Each client is built on first use, at most once, and only from a complete
/// config section; otherwise the accessor fails with
/// [`tally_config::ConfigError::NotConfigured`].
pub struct AppContext {
    pub config: TallyConfig,
    pub retry: RetryPolicy,
    timeout: Duration,
    search: OnceLock<SearchClient>,
    key_phrases: OnceLock<KeyPhraseClient>,
    chat: OnceLock<ChatClient>,
}

impl AppContext {
    #[must_use]
    pub fn new(config: TallyConfig) -> Self {
        Self {
            timeout: config.general.request_timeout(),
            config,
            retry: RetryPolicy::default(),
            search: OnceLock::new(),
            key_phrases: OnceLock::new(),
            chat: OnceLock::new(),
        }
    }

    pub fn search(&self) -> anyhow::Result<&SearchClient> {
        if let Some(client) = self.search.get() {
            return Ok(client);
        }
        let client = SearchClient::from_config(self.config.require_search()?, self.timeout)?;
        Ok(self.search.get_or_init(|| client))
    }

    pub fn key_phrases(&self) -> anyhow::Result<&KeyPhraseClient> {
        if let Some(client) = self.key_phrases.get() {
            return Ok(client);
        }
        let section = self.config.require_text_analytics()?;
        let client = KeyPhraseClient::from_config(section, self.timeout)?;
        Ok(self.key_phrases.get_or_init(|| client))
    }

    pub fn chat(&self) -> anyhow::Result<&ChatClient> {
        if let Some(client) = self.chat.get() {
            return Ok(client);
        }
        let client = ChatClient::from_config(self.config.require_openai()?, self.timeout)?;
        Ok(self.chat.get_or_init(|| client))
    }
}
