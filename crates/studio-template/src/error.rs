//! Error types for template operations

use thiserror::Error;

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Errors that can occur while validating or rendering templates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Template text could not be parsed
    #[error("Failed to parse template: {0}")]
    Parse(String),

    /// Template parsed but rendering failed
    #[error("Failed to render template: {0}")]
    Render(String),

    /// Variable metadata is inconsistent
    #[error("Invalid variable '{name}': {detail}")]
    InvalidVariable { name: String, detail: String },

    /// Lock error for thread safety
    #[error("Lock error: {0}")]
    Lock(String),
}
