//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted report with the per-agent breakdown
    Full,
    /// JSON output
    Json,
}

/// CLI arguments for case-council
#[derive(Parser, Debug)]
#[command(name = "case-council")]
#[command(author, version, about = "Case Council - specialist agents deliberate and reach consensus")]
#[command(long_about = r#"
Case Council puts a question about a case to a fixed roster of specialist
agents (legal compliance, trauma-informed analysis, bias detection, evidence
analysis, risk assessment), collects their votes concurrently, and reduces
them to a consensus with a disagreement signal.

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables (e.g. COUNCIL_PROVIDER__KIND=mock)
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/case-council/config.toml   Global config

Cases are read from the JSON file named by `[cases] path` (or
COUNCIL_CASES__PATH). No file is loaded by default, so every lookup misses
until one is configured. The repository ships sample cases:
  [cases]
  path = "data/cases.json"

Example:
  case-council analyze 0148
  case-council analyze NW-2025-TIX-0147 --question "Is interim action warranted?"
  case-council bias-check "The complainant was hysterical"
  case-council serve < requests.jsonl
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the council on a case
    Analyze {
        /// Case id or case number
        case_id: String,

        /// Question to put to the council (defaults to the configured question)
        #[arg(long)]
        question: Option<String>,

        /// Re-run even if a result is already stored
        #[arg(long)]
        force: bool,
    },

    /// Show a stored result without running the council
    Cached {
        case_id: String,

        #[arg(long)]
        question: Option<String>,
    },

    /// Scan text for loaded or judgmental phrasing
    BiasCheck {
        /// Text to check
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Answer line-delimited JSON requests on stdin
    Serve,

    /// Print service health
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "case-council",
            "analyze",
            "0148",
            "--question",
            "Is interim action warranted?",
            "--force",
            "-vv",
            "-o",
            "json",
        ]);
        assert_eq!(
            cli.command,
            Some(Command::Analyze {
                case_id: "0148".to_string(),
                question: Some("Is interim action warranted?".to_string()),
                force: true,
            })
        );
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_bias_check_requires_text_or_file() {
        assert!(Cli::try_parse_from(["case-council", "bias-check"]).is_err());
        assert!(
            Cli::try_parse_from(["case-council", "bias-check", "text", "--file", "notes.txt"])
                .is_err()
        );

        let cli = Cli::parse_from(["case-council", "bias-check", "--file", "notes.txt"]);
        assert_eq!(
            cli.command,
            Some(Command::BiasCheck {
                text: None,
                file: Some(PathBuf::from("notes.txt")),
            })
        );
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::parse_from(["case-council", "--no-config", "-q", "health"]);
        assert!(cli.no_config);
        assert!(cli.quiet);
        assert_eq!(cli.command, Some(Command::Health));
    }

    #[test]
    fn test_show_config_without_subcommand() {
        let cli = Cli::parse_from(["case-council", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_long_help_names_case_file_setting() {
        use clap::CommandFactory;
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("[cases] path"));
        assert!(help.contains("COUNCIL_CASES__PATH"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
