//! The service facade shared by every surface

use std::fmt;
use std::sync::Arc;

use studio_llm::CompletionProvider;
use studio_store::{BackendMode, Persistence};
use studio_template::TemplateRenderer;

use crate::config::ServiceConfig;

/// Template management, analysis, preview and generation over a
/// persistence collaborator and an optional completion collaborator
///
/// Operations are grouped by concern in sibling modules; each adds an
/// `impl StudioService` block.
pub struct StudioService {
    pub(crate) store: Arc<dyn Persistence>,
    pub(crate) completion: Option<Arc<dyn CompletionProvider>>,
    pub(crate) renderer: TemplateRenderer,
    pub(crate) config: ServiceConfig,
}

impl StudioService {
    /// Create a service over `store` with no completion provider
    pub fn new(store: Arc<dyn Persistence>, config: ServiceConfig) -> Self {
        Self {
            store,
            completion: None,
            renderer: TemplateRenderer::with_cache_capacity(config.render_cache_capacity),
            config,
        }
    }

    /// Attach a completion provider
    pub fn with_completion(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(provider);
        self
    }

    /// Name of the configured completion provider, if any
    pub fn completion_name(&self) -> Option<&str> {
        self.completion.as_deref().map(|provider| provider.name())
    }

    /// Active persistence backend
    pub fn backend_mode(&self) -> BackendMode {
        self.store.mode()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }
}

impl fmt::Debug for StudioService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudioService")
            .field("backend", &self.store.mode())
            .field("completion", &self.completion_name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
