use axum::http::HeaderValue;
use studio_utils::{ConfigError, EnvSource};

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`)
    pub host: String,
    /// Bind port (default: `3000`)
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`)
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvSource::from_env())
    }

    /// Load configuration with defaults
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    pub fn from_source(env: &EnvSource) -> Result<Self, ConfigError> {
        let cors_origins = env.list_or("CORS_ORIGINS", "http://localhost:3000");
        for origin in &cors_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::Invalid {
                    key: "CORS_ORIGINS".to_string(),
                    value: origin.clone(),
                    reason: "not a valid origin header value".to_string(),
                });
            }
        }

        Ok(Self {
            host: env.get_or("HOST", "0.0.0.0"),
            port: env.parse_or("PORT", 3000)?,
            cors_origins,
            request_timeout_secs: env.parse_or("REQUEST_TIMEOUT_SECS", 30)?,
        })
    }

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
