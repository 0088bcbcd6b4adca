//! Command handlers -- one module per subcommand

pub mod config;
pub mod formats;
pub mod logs;
pub mod parse;

use std::path::Path;

use sentryedge_core::config::SentryEdgeConfig;
use sentryedge_core::error::SentryEdgeError;

/// Load the configuration, or defaults plus environment overrides when the file is absent.
///
/// `parse`, `formats` and `logs` work without a config file; `config` requires one.
pub(crate) async fn load_or_default(path: &Path) -> Result<SentryEdgeConfig, SentryEdgeError> {
    if path.exists() {
        return SentryEdgeConfig::load(path).await;
    }
    tracing::debug!(path = %path.display(), "config file not found, using defaults");
    let mut config = SentryEdgeConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
