//! # tally-config
//!
//! Layered configuration loading for incident tally using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TALLY_*` prefix, `__` as separator)
//! 2. Legacy `AZURE_*` variables (see [`LEGACY_ENV_KEYS`])
//! 3. The file passed with `--config`, or `./tally.toml`
//! 4. User-level `~/.config/tally/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `TALLY_SEARCH__ENDPOINT` -> `search.endpoint`,
//! `TALLY_GENERAL__LEXICAL_TOP` -> `general.lexical_top`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use tally_config::TallyConfig;
//!
//! let config = TallyConfig::load_with_dotenv(None).expect("config");
//! if config.search.is_configured() {
//!     println!("index: {}", config.search.index_name);
//! }
//! ```

mod distribution;
mod error;
mod general;
mod openai;
mod search;
mod text_analytics;

pub use distribution::{GroundTruth, GroundTruthEntry};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use openai::OpenAiConfig;
pub use search::SearchConfig;
pub use text_analytics::TextAnalyticsConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Prefix for first-class environment overrides.
pub const ENV_PREFIX: &str = "TALLY_";

/// Project-local config file picked up when `--config` is not given.
pub const LOCAL_CONFIG_FILE: &str = "tally.toml";

/// Variable names accepted for compatibility with older deployments, and the
/// config keys they fill.
pub const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("AZURE_SEARCH_ENDPOINT", "search.endpoint"),
    ("AZURE_SEARCH_KEY", "search.api_key"),
    ("AZURE_TEXT_ANALYTICS_ENDPOINT", "text_analytics.endpoint"),
    ("AZURE_TEXT_ANALYTICS_KEY", "text_analytics.api_key"),
    ("AZURE_OPENAI_ENDPOINT", "openai.endpoint"),
    ("AZURE_OPENAI_KEY", "openai.api_key"),
    ("AZURE_OPENAI_DEPLOYMENT", "openai.deployment"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub text_analytics: TextAnalyticsConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TallyConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source is malformed or a value
    /// has the wrong type.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(config_file).extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the current directory, then all other sources.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        // a missing .env is fine
        let _ = dotenvy::dotenv();
        Self::load(config_file)
    }

    /// Build the figment provider chain.
    ///
    /// An explicit `config_file` replaces `./tally.toml`; it is read even if
    /// it does not exist, so a mistyped path surfaces as an extraction error.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        match config_file {
            Some(path) => figment = figment.merge(Toml::file_exact(path)),
            None => {
                let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
                if local_path.exists() {
                    figment = figment.merge(Toml::file(local_path));
                }
            }
        }

        figment
            .merge(Self::legacy_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Map the legacy `AZURE_*` names onto config keys.
    fn legacy_env() -> Env {
        Env::raw().filter_map(|key| {
            LEGACY_ENV_KEYS
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map(|(_, path)| (*path).into())
        })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }

    /// Fail with [`ConfigError::NotConfigured`] unless the search section is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the `search` section.
    pub fn require_search(&self) -> Result<&SearchConfig, ConfigError> {
        require(&self.search, SearchConfig::is_configured, "search")
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the `text_analytics` section.
    pub fn require_text_analytics(&self) -> Result<&TextAnalyticsConfig, ConfigError> {
        require(
            &self.text_analytics,
            TextAnalyticsConfig::is_configured,
            "text_analytics",
        )
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the `openai` section.
    pub fn require_openai(&self) -> Result<&OpenAiConfig, ConfigError> {
        require(&self.openai, OpenAiConfig::is_configured, "openai")
    }
}

fn require<'a, T>(
    section: &'a T,
    is_configured: impl Fn(&T) -> bool,
    name: &str,
) -> Result<&'a T, ConfigError> {
    if is_configured(section) {
        Ok(section)
    } else {
        Err(ConfigError::NotConfigured {
            section: name.to_string(),
        })
    }
}

/// Render a secret for logs: one `*` per character, or `not set`.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        "not set".to_string()
    } else {
        "*".repeat(secret.chars().count())
    }
}
