//! Pipeline paths, page sizes and timings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/small")
}

fn default_distribution_path() -> PathBuf {
    PathBuf::from("config/incident_type_distribution.json")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

const fn default_lexical_top() -> u32 {
    50
}

const fn default_model_top() -> u32 {
    100
}

const fn default_discovery_scan_limit() -> u32 {
    1000
}

const fn default_discovery_batch_size() -> usize {
    10
}

const fn default_discovery_top_n() -> usize {
    20
}

const fn default_batch_delay_ms() -> u64 {
    1000
}

const fn default_settle_secs() -> u64 {
    10
}

const fn default_poll_attempts() -> u32 {
    5
}

const fn default_poll_interval_secs() -> u64 {
    5
}

const fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory holding the `*.txt` corpus.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Ground-truth `label -> count` JSON file.
    #[serde(default = "default_distribution_path")]
    pub distribution_path: PathBuf,

    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Documents retrieved per label by the lexical estimator.
    #[serde(default = "default_lexical_top")]
    pub lexical_top: u32,

    /// Documents retrieved per label by the model estimator.
    #[serde(default = "default_model_top")]
    pub model_top: u32,

    #[serde(default = "default_discovery_scan_limit")]
    pub discovery_scan_limit: u32,

    #[serde(default = "default_discovery_batch_size")]
    pub discovery_batch_size: usize,

    #[serde(default = "default_discovery_top_n")]
    pub discovery_top_n: usize,

    /// Pause before each discovery batch after the first.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Wait after upload before checking the index document count.
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Quote multi-word labels so the index matches them as phrases.
    #[serde(default)]
    pub phrase_search: bool,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            distribution_path: default_distribution_path(),
            reports_dir: default_reports_dir(),
            lexical_top: default_lexical_top(),
            model_top: default_model_top(),
            discovery_scan_limit: default_discovery_scan_limit(),
            discovery_batch_size: default_discovery_batch_size(),
            discovery_top_n: default_discovery_top_n(),
            batch_delay_ms: default_batch_delay_ms(),
            settle_secs: default_settle_secs(),
            poll_attempts: default_poll_attempts(),
            poll_interval_secs: default_poll_interval_secs(),
            phrase_search: false,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GeneralConfig {
    #[must_use]
    pub const fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Default report path used by `run` when no output is given.
    #[must_use]
    pub fn default_report_path(&self) -> PathBuf {
        self.reports_dir.join("incident_analysis.json")
    }

    /// Default output path for discovered terms.
    #[must_use]
    pub fn default_terms_path(&self) -> PathBuf {
        self.reports_dir.join("terms_discovered.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data/small"));
        assert_eq!(config.lexical_top, 50);
        assert_eq!(config.model_top, 100);
        assert_eq!(config.discovery_scan_limit, 1000);
        assert_eq!(config.discovery_batch_size, 10);
        assert_eq!(config.discovery_top_n, 20);
        assert_eq!(config.settle_delay(), Duration::from_secs(10));
        assert_eq!(config.poll_attempts, 5);
        assert!(!config.phrase_search);
    }

    #[test]
    fn report_paths_live_under_reports_dir() {
        let config = GeneralConfig {
            reports_dir: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(config.default_report_path(), PathBuf::from("out/incident_analysis.json"));
        assert_eq!(config.default_terms_path(), PathBuf::from("out/terms_discovered.json"));
    }
}
