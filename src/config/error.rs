//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Options file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Options JSON parsing error")]
    Json(#[from] serde_json::Error),

    #[error("Options validation error: {0}")]
    Validation(String),
}
