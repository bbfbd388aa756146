use anyhow::Context;
use tally_config::{TallyConfig, mask_secret};

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration, and log which services are set up.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TallyConfig> {
    let config = TallyConfig::load_with_dotenv(flags.config.as_deref()).with_context(|| {
        match &flags.config {
            Some(path) => format!("failed to load configuration from {}", path.display()),
            None => "failed to load configuration".to_string(),
        }
    })?;
    log_services(&config);
    Ok(config)
}

fn log_services(config: &TallyConfig) {
    tracing::info!(
        configured = config.search.is_configured(),
        endpoint = %config.search.endpoint,
        index = %config.search.index_name,
        api_key = %mask_secret(&config.search.api_key),
        "search service"
    );
    tracing::info!(
        configured = config.text_analytics.is_configured(),
        endpoint = %config.text_analytics.endpoint,
        api_key = %mask_secret(&config.text_analytics.api_key),
        "key-phrase service"
    );
    tracing::info!(
        configured = config.openai.is_configured(),
        endpoint = %config.openai.endpoint,
        deployment = %config.openai.deployment,
        api_key = %mask_secret(&config.openai.api_key),
        "chat-completion service"
    );
}
