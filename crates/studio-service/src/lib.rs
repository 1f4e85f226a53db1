//! Service layer for prompt-studio
//!
//! [`StudioService`] ties the template core to its two collaborators: a
//! [`Persistence`](studio_store::Persistence) backend for templates, versions,
//! style profiles and prompt logs, and an optional
//! [`CompletionProvider`](studio_llm::CompletionProvider) used for generation
//! and model-assisted analysis.
//!
//! Every operation returns a [`ServiceError`] whose variant determines how
//! surfaces report it (validation, not found, collaborator failure).

mod analysis;
mod config;
mod error;
mod generation;
mod logs;
mod service;
mod templates;
mod versions;

#[cfg(test)]
mod testing;

pub use analysis::{AnalysisSource, TemplateAnalysis};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::{Result, ServiceError};
pub use generation::{GenerateRequest, Generation, Preview, PreviewRequest};
pub use service::StudioService;
pub use templates::{NewTemplate, TemplateFilter, TemplatePatch};
pub use versions::NewVersion;
