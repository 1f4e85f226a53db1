//! Handlebars-backed template rendering
//!
//! Rendering is modelled as a `Result`; [`TemplateRenderer::render_or_sentinel`]
//! is the fail-closed boundary used by preview and other string-only callers.

use std::sync::Mutex;

use cached::{Cached, SizedCache};
use handlebars::{Context, Handlebars, Renderable, StringOutput, Template};
use tracing::{debug, warn};

use crate::context::RenderContext;
use crate::error::{Result, TemplateError};

/// Returned in place of output when a template cannot be rendered
pub const RENDER_ERROR_SENTINEL: &str = "Error: Template could not be rendered";

/// Default number of compiled templates kept in memory
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Renders template text against a [`RenderContext`]
///
/// Supports `{{name}}`, dotted paths, `{{#if}}`/`{{else}}`/`{{/if}}`,
/// `{{#each}}` and the other Handlebars built-ins. Missing values render as
/// empty strings. Output is not HTML-escaped.
///
/// Compiled templates are cached keyed by their exact text. Caller text is
/// never registered, so partials (`{{> name}}`) have nothing to resolve and
/// fail to render.
pub struct TemplateRenderer {
    inner: Mutex<RendererState>,
}

struct RendererState {
    registry: Handlebars<'static>,
    compiled: SizedCache<String, Template>,
}

impl TemplateRenderer {
    /// Create a renderer with the default cache capacity
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a renderer caching up to `capacity` compiled templates
    pub fn with_cache_capacity(capacity: usize) -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);

        Self {
            inner: Mutex::new(RendererState {
                registry,
                compiled: SizedCache::with_size(capacity.max(1)),
            }),
        }
    }

    /// Render `text`, reporting parse and render failures
    pub fn render(&self, text: &str, context: &RenderContext) -> Result<String> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| TemplateError::Lock(e.to_string()))?;
        let state = &mut *guard;

        let key = text.to_string();
        let template = if let Some(template) = state.compiled.cache_get(&key) {
            template.clone()
        } else {
            debug!(len = text.len(), "Compiling template");
            let template =
                Template::compile(text).map_err(|e| TemplateError::Parse(e.to_string()))?;
            let _ = state.compiled.cache_set(key, template.clone());
            template
        };

        let data =
            Context::wraps(context.as_map()).map_err(|e| TemplateError::Render(e.to_string()))?;
        let mut output = StringOutput::new();
        let mut render_context = handlebars::RenderContext::new(None);
        template
            .render(&state.registry, &data, &mut render_context, &mut output)
            .map_err(|e| TemplateError::Render(e.to_string()))?;
        output
            .into_string()
            .map_err(|e| TemplateError::Render(e.to_string()))
    }

    /// Render `text`, substituting [`RENDER_ERROR_SENTINEL`] on failure
    pub fn render_or_sentinel(&self, text: &str, context: &RenderContext) -> String {
        match self.render(text, context) {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Error rendering template");
                RENDER_ERROR_SENTINEL.to_string()
            }
        }
    }

    /// Number of compiled templates currently cached
    pub fn cached_templates(&self) -> usize {
        self.inner
            .lock()
            .map(|state| state.compiled.cache_size())
            .unwrap_or_default()
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("cached_templates", &self.cached_templates())
            .finish()
    }
}

/// Render once with a throwaway renderer
pub fn render(text: &str, context: &RenderContext) -> String {
    TemplateRenderer::with_cache_capacity(1).render_or_sentinel(text, context)
}
