//! CLI-specific error types and exit code mapping

use sentryedge_core::error::{SentryEdgeError, StorageError};
use sentryedge_normalizer::NormalizeError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from sentryedge-core.
    #[error("{0}")]
    Core(#[from] SentryEdgeError),

    /// Normalization failure (invalid `raw_b64`, unknown rule).
    #[error("normalize error: {0}")]
    Normalize(#[from] NormalizeError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                 |
    /// |------|-------------------------|
    /// | 0    | Success                 |
    /// | 1    | General / command error |
    /// | 2    | Configuration error     |
    /// | 10   | IO error                |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(SentryEdgeError::Config(_)) => 2,
            Self::Io(_) | Self::Core(SentryEdgeError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) | Self::Normalize(_) => 1,
        }
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::Core(SentryEdgeError::Storage(e))
    }
}
