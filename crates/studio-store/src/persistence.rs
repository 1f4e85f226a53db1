//! Persistence collaborator contract

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::query::Query;

/// One stored record
pub type Row = Map<String, Value>;

/// Table names
pub mod tables {
    pub const TEMPLATES: &str = "templates";
    pub const TEMPLATE_VERSIONS: &str = "template_versions";
    pub const STYLE_PROFILES: &str = "style_profiles";
    pub const PROMPT_LOGS: &str = "prompt_logs";
}

/// Which backend is serving requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Seeded in-process tables
    Memory,
    /// Hosted PostgREST-style API
    Rest,
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendMode::Memory => write!(f, "memory"),
            BackendMode::Rest => write!(f, "rest"),
        }
    }
}

/// Generic table access used by the service layer
///
/// Every failure is returned as a [`StoreError`]; nothing panics across this
/// boundary. Rows are addressed by their `id` column.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Rows matching `query`
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>>;

    /// Insert a record and return the stored row (with generated id/timestamps)
    async fn insert(&self, table: &str, record: Row) -> Result<Row>;

    /// Merge `patch` into row `id` and return the updated row
    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Row>;

    /// Delete row `id`
    async fn delete(&self, table: &str, id: &str) -> Result<()>;

    /// Backend variant, fixed at construction
    fn mode(&self) -> BackendMode;
}

/// Serialize a record into a row
pub fn to_row<T: Serialize>(record: &T) -> Result<Row> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidRecord(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Deserialize a row into a record
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T> {
    serde_json::from_value(Value::Object(row)).map_err(|e| StoreError::InvalidRecord(e.to_string()))
}

/// Deserialize many rows
pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter().map(from_row).collect()
}

/// Extract the id of a row as text
pub fn row_id(row: &Row) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
