use std::sync::Arc;

use studio_service::StudioService;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`
///
/// Cheap to clone; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Template, analysis and generation operations
    pub service: Arc<StudioService>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Masked completion API key for the status endpoint
    pub api_key_hint: Option<String>,
}

impl AppState {
    pub fn new(service: StudioService, config: ServerConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
            api_key_hint: None,
        }
    }

    /// Record a masked form of the completion API key
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key_hint = Some(mask_key(api_key));
        self
    }
}

/// `abc...xyz`, or `***` for keys shorter than ten characters
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 10 {
        return "***".to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{head}...{tail}")
}
