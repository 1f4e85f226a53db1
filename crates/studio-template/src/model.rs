//! Persisted domain records
//!
//! Field names follow the stored JSON shape (`template` holds the text,
//! `type` the variable kind). Deserialization is lenient towards rows written
//! by older clients: numeric ids, `null` collections and variables stored as
//! an encoded JSON string are all accepted.

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::placeholder::extract_placeholders;
use crate::variable::{TemplateVariable, reconcile};

/// A named, versioned prompt template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Source of truth; `variables` is derived from it
    #[serde(rename = "template")]
    pub template_text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "variables_lenient")]
    pub variables: Vec<TemplateVariable>,
    #[serde(default = "first_version", deserialize_with = "version_lenient")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_id_string")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage_count: u64,
}

impl Template {
    /// Placeholders referenced by the text
    pub fn placeholders(&self) -> Vec<String> {
        extract_placeholders(&self.template_text)
    }

    /// Stored category, or the first word of the name
    pub fn effective_category(&self) -> String {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map_or_else(|| default_category(&self.name), str::to_string)
    }

    /// Fill derived fields and repair the variable cache against the text
    pub fn normalized(mut self) -> Self {
        self.category = Some(self.effective_category());
        self.variables = reconcile(&self.placeholders(), &self.variables);
        self
    }
}

/// First whitespace-separated word of a template name
pub fn default_category(name: &str) -> String {
    name.split_whitespace().next().unwrap_or_default().to_string()
}

/// Immutable snapshot of a template's text and variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateVersion {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub template_id: String,
    pub version: u32,
    #[serde(rename = "template")]
    pub template_text: String,
    #[serde(default, deserialize_with = "variables_lenient")]
    pub variables: Vec<TemplateVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Tone/voice record injected into render contexts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub json_payload: Value,
}

impl StyleProfile {
    /// Object exposed under `content_style_profile`
    ///
    /// Contains `id`, `name`, `json_payload`, plus each payload field at top
    /// level unless it would shadow one of those three.
    pub fn to_context_value(&self) -> Value {
        let mut object = Map::new();
        if let Value::Object(payload) = &self.json_payload {
            for (key, value) in payload {
                object.insert(key.clone(), value.clone());
            }
        }
        object.insert("id".to_string(), Value::String(self.id.clone()));
        object.insert("name".to_string(), Value::String(self.name.clone()));
        object.insert("json_payload".to_string(), self.json_payload.clone());
        Value::Object(object)
    }
}

/// One logged prompt submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptLog {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    pub prompt_object: Value,
    pub result_tokens: u64,
    pub cost_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PromptLog {
    /// Build a log entry with rough token and cost estimates
    ///
    /// Tokens are approximated as one per four characters; `rate_per_1k` is
    /// the price of a thousand tokens.
    pub fn estimate(prompt_object: Value, result: &str, rate_per_1k: f64) -> Self {
        let prompt_tokens = estimate_tokens(&prompt_object.to_string());
        let result_tokens = estimate_tokens(result);
        let cost_usd = (prompt_tokens + result_tokens) as f64 / 1000.0 * rate_per_1k;

        Self {
            id: None,
            prompt_object,
            result_tokens,
            cost_usd,
            created_at: None,
        }
    }
}

/// `ceil(chars / 4)`
pub fn estimate_tokens(text: &str) -> u64 {
    text.chars().count().div_ceil(4) as u64
}

fn first_version() -> u32 {
    1
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn version_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Option::<u32>::deserialize(deserializer).map(|v| v.filter(|v| *v > 0).unwrap_or(1))
}

fn variables_lenient<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<TemplateVariable>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(encoded) if encoded.trim().is_empty() => Ok(Vec::new()),
        Value::String(encoded) => serde_json::from_str(&encoded).map_err(de::Error::custom),
        other => serde_json::from_value(other).map_err(de::Error::custom),
    }
}
