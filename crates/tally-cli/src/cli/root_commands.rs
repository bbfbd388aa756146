use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Recreate the search index and upload the `*.txt` corpus.
    Index(IndexArgs),
    /// Estimate how often one incident type occurs.
    Count(CountArgs),
    /// Estimate every incident type in the ground-truth distribution and write a report.
    Run(RunArgs),
    /// Discover the most frequent incident categories in the index.
    Discover(DiscoverArgs),
}

/// How a label's count is estimated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum EstimateMethod {
    /// Substring occurrences and matching key phrases.
    #[default]
    Lexical,
    /// Ask the chat model for a number.
    Model,
}

/// How categories are discovered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum DiscoveryMethod {
    /// Most frequent key phrases.
    #[default]
    Phrases,
    /// Categories named by the chat model.
    Model,
}

/// Arguments for `tally index`.
#[derive(Clone, Debug, Args)]
pub struct IndexArgs {
    /// Corpus directory (defaults to `general.data_dir`).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Keep the existing index and only upload.
    #[arg(long)]
    pub skip_recreate: bool,
}

/// Arguments for `tally count`.
#[derive(Clone, Debug, Args)]
pub struct CountArgs {
    /// Incident type to count.
    pub label: String,
    #[arg(long, value_enum, default_value_t)]
    pub method: EstimateMethod,
}

/// Arguments for `tally run`.
#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    #[arg(long, value_enum, default_value_t)]
    pub method: EstimateMethod,
    /// JSON report path, or a directory for `incident_analysis.json`; the CSV is written next to it.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Append `_YYYYmmdd_HHMMSS` to the report file names.
    #[arg(long)]
    pub timestamp: bool,
    /// Ground-truth distribution file (defaults to `general.distribution_path`).
    #[arg(long)]
    pub distribution: Option<PathBuf>,
}

/// Arguments for `tally discover`.
#[derive(Clone, Debug, Args)]
pub struct DiscoverArgs {
    #[arg(long, value_enum, default_value_t)]
    pub method: DiscoveryMethod,
    /// Number of categories to keep (defaults to `general.discovery_top_n`).
    #[arg(long)]
    pub top: Option<usize>,
    /// Output path (defaults to `<reports_dir>/terms_discovered.json`).
    #[arg(long)]
    pub output: Option<PathBuf>,
}
