//! CLI command definitions and argument parsing.

use biofacts_extractor::PairSource;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Biofacts - Extract categorized facts and training data from a biography.
#[derive(Debug, Parser)]
#[command(name = "biofacts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract facts from a biography and write the dataset files
    Extract(ExtractArgs),

    /// List the extraction categories
    Categories,

    /// Rebuild the summary report from an existing fact table
    Report(ReportArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Biography file (plain text or markdown)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory the CSV, JSONL and summary are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Chat-completions base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key for the model endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Pause between category requests (milliseconds)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// How training pairs are produced
    #[arg(long, value_enum)]
    pub pairs: Option<PairsArg>,

    /// Person the biography describes
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Attempts per request, retrying transient failures
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Fact table written by `extract`
    #[arg(short, long)]
    pub facts: PathBuf,

    /// Report path (defaults to the summary file next to the fact table)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Person the biography describes
    #[arg(short, long)]
    pub subject: Option<String>,
}

/// Training-pair source options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PairsArg {
    /// Ask the model to write conversation pairs
    Synthesize,
    /// One instruction pair per fact, no model call
    Derive,
    /// No training pairs
    None,
}

impl From<PairsArg> for PairSource {
    fn from(arg: PairsArg) -> Self {
        match arg {
            PairsArg::Synthesize => PairSource::Synthesize,
            PairsArg::Derive => PairSource::Derive,
            PairsArg::None => PairSource::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "biofacts",
            "extract",
            "--input",
            "bio.md",
            "--pairs",
            "derive",
            "--delay-ms",
            "0",
            "--api-key",
            "sk-test",
        ])
        .unwrap();

        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.input, PathBuf::from("bio.md"));
                assert_eq!(args.output_dir, PathBuf::from("."));
                assert_eq!(args.pairs, Some(PairsArg::Derive));
                assert_eq!(args.delay_ms, Some(0));
                assert_eq!(args.api_key.as_deref(), Some("sk-test"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_extract_requires_input() {
        assert!(Cli::try_parse_from(["biofacts", "extract"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["biofacts", "categories", "--no-color", "-v"]).unwrap();
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Categories));
    }

    #[test]
    fn test_pairs_arg_conversion() {
        assert_eq!(PairSource::from(PairsArg::Synthesize), PairSource::Synthesize);
        assert_eq!(PairSource::from(PairsArg::None), PairSource::None);
    }
}
