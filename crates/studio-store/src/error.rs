//! Error types for persistence operations

use thiserror::Error;

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by a persistence backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row with the given id
    #[error("{table} row '{id}' not found")]
    NotFound { table: String, id: String },

    /// The backend rejected the request
    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    /// A record could not be mapped to or from a row
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Backend misconfigured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl StoreError {
    /// Shorthand for [`StoreError::NotFound`]
    pub fn not_found(table: &str, id: &str) -> Self {
        Self::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }

    /// Whether this is a missing-row error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<studio_utils::ConfigError> for StoreError {
    fn from(err: studio_utils::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
