//! Prompt template core for prompt-studio
//!
//! Templates are free-form text with Handlebars-style `{{placeholders}}`.
//! This crate turns that text into structured data and back:
//!
//! - **Extraction**: [`extract_placeholders`] lists the variables a template
//!   references, skipping block helpers such as `{{#if}}`, `{{/if}}` and `{{else}}`
//! - **Reconciliation**: [`reconcile`] merges extracted names with stored
//!   [`TemplateVariable`] metadata, keyed by name
//! - **Rendering**: [`TemplateRenderer`] substitutes a [`RenderContext`]
//!   (including dotted paths into nested objects) and fails closed to
//!   [`RENDER_ERROR_SENTINEL`] at the string boundary
//! - **Form state**: [`FormState`] tracks the values a user has entered for
//!   the selected template and reports which are still missing
//!
//! # Quick Start
//!
//! ```
//! use studio_template::{extract_placeholders, reconcile, RenderContext, TemplateRenderer};
//! use serde_json::json;
//!
//! let text = "Hello {{user.name}}{{#if topic}}, let's talk about {{topic}}{{/if}}.";
//!
//! let names = extract_placeholders(text);
//! assert_eq!(names, vec!["user.name", "topic"]);
//!
//! let variables = reconcile(&names, &[]);
//! assert_eq!(variables[1].description, "Value for topic");
//!
//! let context = RenderContext::from_value(json!({ "user": { "name": "Ada" } }));
//! let renderer = TemplateRenderer::new();
//! assert_eq!(renderer.render_or_sentinel(text, &context), "Hello Ada.");
//! ```

mod context;
mod error;
mod form;
mod model;
mod placeholder;
mod renderer;
mod variable;

// Re-export core types
pub use context::{RenderContext, keys};
pub use error::{Result, TemplateError};
pub use form::{FormField, FormState, field_hint, field_label};
pub use model::{
    PromptLog, StyleProfile, Template, TemplateVersion, default_category, estimate_tokens,
};
pub use placeholder::{extract_placeholders, is_variable_reference, placeholder_template};
pub use renderer::{DEFAULT_CACHE_CAPACITY, RENDER_ERROR_SENTINEL, TemplateRenderer, render};
pub use variable::{TemplateVariable, VariableType, reconcile, reconcile_text};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::RenderContext;
    pub use crate::error::{Result, TemplateError};
    pub use crate::form::FormState;
    pub use crate::model::{StyleProfile, Template, TemplateVersion};
    pub use crate::placeholder::extract_placeholders;
    pub use crate::renderer::TemplateRenderer;
    pub use crate::variable::{TemplateVariable, VariableType, reconcile};
}
