//! CLI argument definitions for sentryedge-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// SentryEdge log ingestion daemon.
///
/// Accepts log payloads of any shape over HTTP, normalizes them into
/// four-field records and persists them to the configured store.
#[derive(Parser, Debug)]
#[command(name = "sentryedge-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to sentryedge.toml configuration file.
    #[arg(short, long, default_value = "/etc/sentryedge/sentryedge.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Override the HTTP bind address (e.g. 127.0.0.1:8787).
    #[arg(long)]
    pub bind: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}
