use tally_config::TallyConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &TallyConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &TallyConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let sections = [
        (
            config.search.is_configured(),
            "Search",
            "TALLY_SEARCH",
            "TALLY_SEARCH__ENDPOINT",
        ),
        (
            config.text_analytics.is_configured(),
            "Text analytics",
            "TALLY_TEXT_ANALYTICS",
            "TALLY_TEXT_ANALYTICS__API_KEY",
        ),
        (
            config.openai.is_configured(),
            "OpenAI",
            "TALLY_OPENAI",
            "TALLY_OPENAI__DEPLOYMENT",
        ),
    ];

    sections
        .into_iter()
        .filter(|(configured, _, prefix, _)| !configured && has_env_prefix(&env_keys, prefix))
        .map(|(_, name, prefix, example)| {
            format!(
                "{name} config appears default while {prefix}* env vars exist. Use double underscores (example: {example})."
            )
        })
        .collect()
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
