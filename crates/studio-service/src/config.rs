//! Configuration for service operations

use studio_llm::completion::DEFAULT_MAX_TOKENS;
use studio_template::DEFAULT_CACHE_CAPACITY;
use studio_utils::EnvSource;

use crate::error::{Result, ServiceError};

/// Tunables for the service layer
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Model used for generation and analysis
    pub model: String,

    /// Price of one thousand tokens, used for prompt log estimates
    pub cost_per_1k_tokens: f64,

    /// Cap on generated tokens per completion
    pub max_completion_tokens: usize,

    /// Compiled templates kept by the renderer
    pub render_cache_capacity: usize,

    /// Default number of prompt logs returned
    pub recent_logs_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            cost_per_1k_tokens: 0.01,
            max_completion_tokens: DEFAULT_MAX_TOKENS,
            render_cache_capacity: DEFAULT_CACHE_CAPACITY,
            recent_logs_limit: 10,
        }
    }
}

impl ServiceConfig {
    /// Create a new configuration builder
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Load from a configuration source
    ///
    /// | Variable                | Default  |
    /// |-------------------------|----------|
    /// | `OPENAI_MODEL`          | `gpt-4o` |
    /// | `COST_PER_1K_TOKENS`    | `0.01`   |
    /// | `MAX_COMPLETION_TOKENS` | `1024`   |
    /// | `RENDER_CACHE_CAPACITY` | `128`    |
    pub fn from_source(env: &EnvSource) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Self::builder()
            .cost_per_1k_tokens(env.parse_or("COST_PER_1K_TOKENS", defaults.cost_per_1k_tokens)?)
            .max_completion_tokens(
                env.parse_or("MAX_COMPLETION_TOKENS", defaults.max_completion_tokens)?,
            )
            .render_cache_capacity(
                env.parse_or("RENDER_CACHE_CAPACITY", defaults.render_cache_capacity)?,
            );
        if let Some(model) = env.get("OPENAI_MODEL") {
            builder = builder.model(model);
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ServiceError::Configuration(
                "model must not be empty".to_string(),
            ));
        }
        if !self.cost_per_1k_tokens.is_finite() || self.cost_per_1k_tokens < 0.0 {
            return Err(ServiceError::Configuration(
                "cost_per_1k_tokens must be a non-negative number".to_string(),
            ));
        }
        if self.max_completion_tokens == 0 {
            return Err(ServiceError::Configuration(
                "max_completion_tokens must be greater than 0".to_string(),
            ));
        }
        if self.render_cache_capacity == 0 {
            return Err(ServiceError::Configuration(
                "render_cache_capacity must be greater than 0".to_string(),
            ));
        }
        if self.recent_logs_limit == 0 {
            return Err(ServiceError::Configuration(
                "recent_logs_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ServiceConfig
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    model: Option<String>,
    cost_per_1k_tokens: Option<f64>,
    max_completion_tokens: Option<usize>,
    render_cache_capacity: Option<usize>,
    recent_logs_limit: Option<usize>,
}

impl ServiceConfigBuilder {
    /// Set the completion model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the estimated price per thousand tokens
    pub fn cost_per_1k_tokens(mut self, cost: f64) -> Self {
        self.cost_per_1k_tokens = Some(cost);
        self
    }

    /// Set the completion token cap
    pub fn max_completion_tokens(mut self, tokens: usize) -> Self {
        self.max_completion_tokens = Some(tokens);
        self
    }

    /// Set the renderer cache size
    pub fn render_cache_capacity(mut self, capacity: usize) -> Self {
        self.render_cache_capacity = Some(capacity);
        self
    }

    /// Set the default prompt log page size
    pub fn recent_logs_limit(mut self, limit: usize) -> Self {
        self.recent_logs_limit = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServiceConfig> {
        let defaults = ServiceConfig::default();

        let config = ServiceConfig {
            model: self.model.unwrap_or(defaults.model),
            cost_per_1k_tokens: self.cost_per_1k_tokens.unwrap_or(defaults.cost_per_1k_tokens),
            max_completion_tokens: self
                .max_completion_tokens
                .unwrap_or(defaults.max_completion_tokens),
            render_cache_capacity: self
                .render_cache_capacity
                .unwrap_or(defaults.render_cache_capacity),
            recent_logs_limit: self.recent_logs_limit.unwrap_or(defaults.recent_logs_limit),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert!((config.cost_per_1k_tokens - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.recent_logs_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ServiceConfig::builder()
            .model("gpt-4o-mini")
            .cost_per_1k_tokens(0.002)
            .recent_logs_limit(25)
            .build()
            .unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.recent_logs_limit, 25);
        assert_eq!(config.render_cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_validation() {
        assert!(ServiceConfig::builder().model(" ").build().is_err());
        assert!(ServiceConfig::builder().cost_per_1k_tokens(-1.0).build().is_err());
        assert!(ServiceConfig::builder().render_cache_capacity(0).build().is_err());
        assert!(ServiceConfig::builder().max_completion_tokens(0).build().is_err());
    }

    #[test]
    fn test_from_source() {
        let env = EnvSource::from_pairs([
            ("OPENAI_MODEL", "local-model"),
            ("COST_PER_1K_TOKENS", "0.5"),
        ]);
        let config = ServiceConfig::from_source(&env).unwrap();
        assert_eq!(config.model, "local-model");
        assert!((config.cost_per_1k_tokens - 0.5).abs() < f64::EPSILON);

        let env = EnvSource::from_pairs([("RENDER_CACHE_CAPACITY", "lots")]);
        assert!(matches!(
            ServiceConfig::from_source(&env),
            Err(ServiceError::Configuration(_))
        ));
    }
}
