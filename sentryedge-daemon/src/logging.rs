//! Tracing setup for sentryedge-daemon.
//!
//! The `[general]` section picks the level and the output shape: JSON lines
//! for log shippers, or pretty multi-line output for local runs.

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use sentryedge_core::config::GeneralConfig;

/// Chatty dependencies capped below the daemon's own level.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "h2=warn"];

/// Install the global subscriber. Call once, before the first span is entered.
///
/// `RUST_LOG`, when set, replaces `config.log_level` entirely.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), &config.log_level)?;

    let installed = match config.log_format.as_str() {
        // request_id and friends come from the per-request span
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
        "pretty" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    };

    installed.with_context(|| format!("failed to install {} subscriber", config.log_format))
}

fn build_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter> {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        return EnvFilter::try_new(directives).context("invalid RUST_LOG");
    }

    let mut filter = EnvFilter::try_new(level).context("invalid general.log_level")?;
    for directive in QUIET_DEPENDENCIES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_rejected() {
        let config = GeneralConfig {
            log_level: "info".to_owned(),
            log_format: "xml".to_owned(),
        };
        let err = init_tracing(&config).unwrap_err();
        assert!(err.to_string().contains("unknown log format"));
    }

    #[test]
    fn level_filter_quiets_dependencies() {
        let filter = build_filter(None, "debug").unwrap().to_string();
        assert!(filter.contains("debug"));
        assert!(filter.contains("hyper=warn"));
    }

    #[test]
    fn rust_log_replaces_level() {
        let filter = build_filter(Some("sentryedge_normalizer=trace"), "info")
            .unwrap()
            .to_string();
        assert!(filter.contains("sentryedge_normalizer=trace"));
        assert!(!filter.contains("hyper=warn"));
    }

    #[test]
    fn blank_rust_log_falls_back_to_level() {
        let filter = build_filter(Some("  "), "warn").unwrap().to_string();
        assert!(filter.contains("hyper=warn"));
    }
}
