//! Error types shared by adsync crates

use thiserror::Error;

/// Result type alias for adsync operations
pub type Result<T> = std::result::Result<T, AdsyncError>;

/// Base error type for adsync
#[derive(Error, Debug)]
pub enum AdsyncError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdsyncError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
