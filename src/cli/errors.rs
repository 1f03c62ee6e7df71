//! CLI-specific error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::content::StoreError;
use crate::rest_api::RestError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors; every one ends the process with a non-zero status
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("failed to load content: {0}")]
    Content(#[from] StoreError),

    #[error("request failed: {0}")]
    Request(#[from] RestError),

    #[error("server failed: {0}")]
    Server(#[source] std::io::Error),

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Stdout(#[source] std::io::Error),
}
