//! Error types for the gatekeeper service.

use thiserror::Error;

use crate::config::ConfigError;

/// Process-level failures. Request-level policy outcomes are not errors;
/// see `gatekeeper::Verdict`.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid upstream address '{0}'")]
    Upstream(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
