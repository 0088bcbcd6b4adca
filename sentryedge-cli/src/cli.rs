//! CLI argument parsing using clap derive API
//!
//! Purely declarative, no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// SentryEdge -- log ingestion and normalization toolkit.
///
/// Use `sentryedge <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "sentryedge", version, about, long_about = None)]
pub struct Cli {
    /// Path to the sentryedge.toml configuration file.
    #[arg(short, long, default_value = "sentryedge.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a payload offline and print the resulting record.
    Parse(ParseArgs),

    /// List registered log formats in priority order.
    Formats(FormatsArgs),

    /// Manage configuration.
    Config(ConfigArgs),

    /// Query a JSONL log store file.
    Logs(LogsArgs),
}

// ---- parse ----

/// Normalize one payload. Reads stdin when neither PAYLOAD nor --file is given.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Raw payload (JSON document or plain text).
    #[arg(conflicts_with = "file")]
    pub payload: Option<String>,

    /// Read the payload from a file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Apply a single named format rule to the payload as a line.
    #[arg(long)]
    pub rule: Option<String>,
}

// ---- formats ----

/// List registered formats.
#[derive(Args, Debug)]
pub struct FormatsArgs {
    /// Only report the format that would claim this line.
    #[arg(long)]
    pub detect: Option<String>,
}

// ---- config ----

/// Manage sentryedge configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, server, normalizer, storage, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}

// ---- logs ----

/// Query stored logs, newest first.
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Store file (default: `[storage] path` from the configuration).
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Filter by service (case-insensitive).
    #[arg(long)]
    pub service: Option<String>,

    /// Filter by level (case-insensitive).
    #[arg(long)]
    pub level: Option<String>,

    /// Maximum number of rows.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Rows to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_inline_payload() {
        let cli = Cli::try_parse_from(["sentryedge", "parse", "level=error boom"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.payload.as_deref(), Some("level=error boom"));
                assert!(args.file.is_none());
                assert!(args.rule.is_none());
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn test_cli_parse_payload_conflicts_with_file() {
        let result = Cli::try_parse_from(["sentryedge", "parse", "x", "--file", "/tmp/a.log"]);
        assert!(result.is_err(), "payload and --file are mutually exclusive");
    }

    #[test]
    fn test_cli_parse_with_rule() {
        let cli = Cli::try_parse_from(["sentryedge", "parse", "--rule", "syslog", "line"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Parse(args) => assert_eq!(args.rule.as_deref(), Some("syslog")),
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn test_cli_global_output_after_subcommand() {
        let cli = Cli::try_parse_from(["sentryedge", "formats", "--output", "json"])
            .expect("parse succeeded");
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Formats(_)));
    }

    #[test]
    fn test_cli_config_show_section() {
        let cli = Cli::try_parse_from(["sentryedge", "config", "show", "--section", "server"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show { section },
            }) => assert_eq!(section.as_deref(), Some("server")),
            _ => panic!("expected Config Show command"),
        }
    }

    #[test]
    fn test_cli_logs_defaults() {
        let cli = Cli::try_parse_from(["sentryedge", "logs"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("sentryedge.toml"));
        match cli.command {
            Commands::Logs(args) => {
                assert_eq!(args.limit, 20);
                assert_eq!(args.offset, 0);
                assert!(args.path.is_none());
            }
            _ => panic!("expected Logs command"),
        }
    }

    #[test]
    fn test_cli_invalid_output_format() {
        let result = Cli::try_parse_from(["sentryedge", "--output", "xml", "formats"]);
        assert!(result.is_err());
    }
}
