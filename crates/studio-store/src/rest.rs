//! Hosted PostgREST-style backend
//!
//! Tables live under `{base}/rest/v1/{table}`. Every request carries the
//! project key both as `apikey` and as a bearer token; writes ask for the
//! affected rows back with `Prefer: return=representation`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use studio_utils::EnvSource;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, StoreError};
use crate::persistence::{BackendMode, Persistence, Row};
use crate::query::Query;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted backend
#[derive(Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anonymous project key
    pub anon_key: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl RestConfig {
    /// Create a config with default timeout
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `STORE_TIMEOUT_SECS`
    pub fn from_source(env: &EnvSource) -> Result<Self> {
        Ok(Self {
            url: env.require("SUPABASE_URL")?,
            anon_key: env.require("SUPABASE_ANON_KEY")?,
            timeout_secs: env.parse_or("STORE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("url", &self.url)
            .field("anon_key", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Backend speaking the PostgREST dialect over HTTP
pub struct RestBackend {
    client: Client,
    base: Url,
    anon_key: String,
}

impl RestBackend {
    /// Create a backend from configuration
    pub fn new(config: RestConfig) -> Result<Self> {
        let mut base = Url::parse(config.url.trim_end_matches('/'))?;
        base.path_segments_mut()
            .map_err(|()| StoreError::Configuration(format!("{} cannot be a base URL", config.url)))?
            .pop_if_empty()
            .extend(["rest", "v1"]);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base,
            anon_key: config.anon_key,
        })
    }

    /// Endpoint for a table with optional query parameters
    fn table_url(&self, table: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Configuration("invalid base URL".to_string()))?
            .push(table);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    fn by_id(&self, table: &str, id: &str) -> Result<Url> {
        self.table_url(table, &[("id".to_string(), format!("eq.{id}"))])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Prefer", "return=representation")
    }

    async fn rows(response: Response) -> Result<Vec<Row>> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(StoreError::Backend {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    fn single(rows: Vec<Row>, table: &str, id: &str) -> Result<Row> {
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(table, id))
    }
}

#[async_trait]
impl Persistence for RestBackend {
    #[instrument(skip(self, query), fields(backend = "rest"))]
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        let url = self.table_url(table, &query.to_params())?;
        debug!(%url, "Selecting rows");
        let response = self.request(Method::GET, url).send().await?;
        Self::rows(response).await
    }

    #[instrument(skip(self, record), fields(backend = "rest"))]
    async fn insert(&self, table: &str, record: Row) -> Result<Row> {
        let url = self.table_url(table, &[])?;
        let response = self.request(Method::POST, url).json(&record).send().await?;
        let rows = Self::rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidRecord(format!("insert into {table} returned no row")))
    }

    #[instrument(skip(self, patch), fields(backend = "rest"))]
    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Row> {
        let url = self.by_id(table, id)?;
        let response = self.request(Method::PATCH, url).json(&patch).send().await?;
        Self::single(Self::rows(response).await?, table, id)
    }

    #[instrument(skip(self), fields(backend = "rest"))]
    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let url = self.by_id(table, id)?;
        let response = self.request(Method::DELETE, url).send().await?;
        Self::single(Self::rows(response).await?, table, id).map(|_| ())
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Rest
    }
}
