use thiserror::Error;

/// Errors produced while reading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config json parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
