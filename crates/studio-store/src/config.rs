//! Backend selection
//!
//! The backend is chosen once at startup. `STORE_BACKEND` forces a variant;
//! otherwise the hosted backend is used when both `SUPABASE_URL` and
//! `SUPABASE_ANON_KEY` are present.

use std::sync::Arc;

use studio_utils::{ConfigError, EnvSource};
use tracing::info;

use crate::error::Result;
use crate::memory::MemoryBackend;
use crate::persistence::{BackendMode, Persistence};
use crate::rest::{RestBackend, RestConfig};

/// Resolved persistence configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Seeded in-memory tables
    Memory,
    /// Hosted backend
    Rest(RestConfig),
}

impl StoreConfig {
    /// Resolve from a configuration source
    pub fn from_source(env: &EnvSource) -> Result<Self> {
        match env.get("STORE_BACKEND").map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("memory") => Ok(Self::Memory),
            Some("rest") => Ok(Self::Rest(RestConfig::from_source(env)?)),
            Some(other) => Err(ConfigError::Invalid {
                key: "STORE_BACKEND".to_string(),
                value: other.to_string(),
                reason: "expected 'memory' or 'rest'".to_string(),
            }
            .into()),
            None if env.get("SUPABASE_URL").is_some() && env.get("SUPABASE_ANON_KEY").is_some() => {
                Ok(Self::Rest(RestConfig::from_source(env)?))
            }
            None => Ok(Self::Memory),
        }
    }

    /// Variant this configuration builds
    pub fn mode(&self) -> BackendMode {
        match self {
            Self::Memory => BackendMode::Memory,
            Self::Rest(_) => BackendMode::Rest,
        }
    }

    /// Construct the backend
    pub fn build(self) -> Result<Arc<dyn Persistence>> {
        let store: Arc<dyn Persistence> = match self {
            Self::Memory => Arc::new(MemoryBackend::seeded()),
            Self::Rest(config) => Arc::new(RestBackend::new(config)?),
        };
        info!(backend = %store.mode(), "Persistence backend ready");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    #[test]
    fn test_defaults_to_memory() {
        let config = StoreConfig::from_source(&EnvSource::from_fn(|_| None)).unwrap();
        assert_eq!(config.mode(), BackendMode::Memory);
    }

    #[test]
    fn test_rest_when_credentials_present() {
        let env = EnvSource::from_pairs([
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "k"),
        ]);
        let config = StoreConfig::from_source(&env).unwrap();
        assert_eq!(config.mode(), BackendMode::Rest);
    }

    #[test]
    fn test_partial_credentials_fall_back_to_memory() {
        let env = EnvSource::from_pairs([("SUPABASE_URL", "https://x.supabase.co")]);
        assert_eq!(StoreConfig::from_source(&env).unwrap().mode(), BackendMode::Memory);
    }

    #[test]
    fn test_forced_memory() {
        let env = EnvSource::from_pairs([
            ("STORE_BACKEND", "Memory"),
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "k"),
        ]);
        assert_eq!(StoreConfig::from_source(&env).unwrap().mode(), BackendMode::Memory);
    }

    #[test]
    fn test_forced_rest_requires_credentials() {
        let env = EnvSource::from_pairs([("STORE_BACKEND", "rest")]);
        assert!(matches!(
            StoreConfig::from_source(&env),
            Err(StoreError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_backend() {
        let env = EnvSource::from_pairs([("STORE_BACKEND", "sqlite")]);
        let err = StoreConfig::from_source(&env).unwrap_err();
        assert!(err.to_string().contains("sqlite"));
    }

    #[tokio::test]
    async fn test_build_memory() {
        let store = StoreConfig::Memory.build().unwrap();
        assert_eq!(store.mode(), BackendMode::Memory);
    }
}
