use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `tally` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "Estimate incident-type counts in a search-indexed report corpus"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./tally.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::root_commands::{DiscoveryMethod, EstimateMethod};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "tally",
            "--format",
            "table",
            "--verbose",
            "--config",
            "alt.toml",
            "count",
            "fire",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert_eq!(cli.global_flags().config.as_deref(), Some(Path::new("alt.toml")));
        assert!(matches!(cli.command, Commands::Count(ref args) if args.label == "fire"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["tally", "run", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn count_requires_a_label() {
        assert!(Cli::try_parse_from(["tally", "count"]).is_err());
    }

    #[test]
    fn count_defaults_to_lexical() {
        let cli = Cli::try_parse_from(["tally", "count", "slip and fall"]).expect("cli should parse");
        let Commands::Count(args) = cli.command else {
            panic!("expected count");
        };
        assert_eq!(args.method, EstimateMethod::Lexical);
        assert_eq!(args.label, "slip and fall");
    }

    #[test]
    fn run_accepts_method_output_and_timestamp() {
        let cli = Cli::try_parse_from([
            "tally",
            "run",
            "--method",
            "model",
            "--output",
            "reports/openai.json",
            "--timestamp",
        ])
        .expect("cli should parse");
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.method, EstimateMethod::Model);
        assert_eq!(args.output.as_deref(), Some(Path::new("reports/openai.json")));
        assert!(args.timestamp);
    }

    #[test]
    fn discover_parses_method_and_top() {
        let cli = Cli::try_parse_from(["tally", "discover", "--method", "model", "--top", "5"])
            .expect("cli should parse");
        let Commands::Discover(args) = cli.command else {
            panic!("expected discover");
        };
        assert_eq!(args.method, DiscoveryMethod::Model);
        assert_eq!(args.top, Some(5));
    }

    #[test]
    fn index_flags() {
        let cli = Cli::try_parse_from(["tally", "index", "--data-dir", "data/big", "--skip-recreate"])
            .expect("cli should parse");
        let Commands::Index(args) = cli.command else {
            panic!("expected index");
        };
        assert_eq!(args.data_dir.as_deref(), Some(Path::new("data/big")));
        assert!(args.skip_recreate);
    }

    #[test]
    fn rejects_unknown_method() {
        assert!(Cli::try_parse_from(["tally", "count", "fire", "--method", "magic"]).is_err());
        assert!(Cli::try_parse_from(["tally", "--format", "xml", "run"]).is_err());
    }
}
