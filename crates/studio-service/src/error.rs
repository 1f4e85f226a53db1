//! Error types for service operations

use studio_llm::CompletionError;
use studio_store::{StoreError, tables};
use studio_template::TemplateError;
use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by the service layer
///
/// Validation failures happen before any side effect. Collaborator failures
/// are wrapped as they cross the boundary.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Caller input rejected
    #[error("{0}")]
    Validation(String),

    /// Entity does not exist
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Template text could not be rendered for submission
    #[error("Template could not be rendered: {0}")]
    Render(String),

    /// Persistence collaborator failed
    #[error("Storage error: {0}")]
    Store(StoreError),

    /// Completion collaborator failed
    #[error("Completion service error: {0}")]
    Completion(#[from] CompletionError),

    /// No completion provider configured
    #[error("Completion service is not configured")]
    CompletionUnavailable,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Shorthand for [`ServiceError::Validation`]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for [`ServiceError::NotFound`]
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { table, id } => Self::NotFound {
                entity: entity_name(&table).to_string(),
                id,
            },
            other => Self::Store(other),
        }
    }
}

/// Display name for rows of a table
pub(crate) fn entity_name(table: &str) -> &str {
    match table {
        tables::TEMPLATES => "Template",
        tables::TEMPLATE_VERSIONS => "Template version",
        tables::STYLE_PROFILES => "Style profile",
        tables::PROMPT_LOGS => "Prompt log",
        other => other,
    }
}

impl From<TemplateError> for ServiceError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::InvalidVariable { .. } => Self::Validation(err.to_string()),
            TemplateError::Parse(detail) | TemplateError::Render(detail) => Self::Render(detail),
            TemplateError::Lock(detail) => Self::Internal(detail),
        }
    }
}

impl From<studio_utils::ConfigError> for ServiceError {
    fn from(err: studio_utils::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
