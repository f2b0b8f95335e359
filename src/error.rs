//! Error types for the notification center.

use thiserror::Error;

/// Main error type for center operations.
#[derive(Debug, Error)]
pub enum CenterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Notification center not initialized")]
    NotInitialized,

    #[error("Notification center has been shut down")]
    ShutDown,

    #[error("Notification {0} must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

impl From<toml::de::Error> for CenterError {
    fn from(e: toml::de::Error) -> Self {
        CenterError::ConfigParse(e.to_string())
    }
}

/// Result type for center operations.
pub type Result<T> = std::result::Result<T, CenterError>;
