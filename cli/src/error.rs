//! Unified error handling for the command line driver.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Engine error: {0}")]
    Engine(#[from] tabula_engine::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] tabula_engine::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Usage: {0}")]
    Usage(String),
}

/// Result type alias for the driver.
pub type Result<T> = std::result::Result<T, CliError>;
