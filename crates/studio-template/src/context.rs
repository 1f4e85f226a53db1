//! Render context for template interpolation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::StyleProfile;

/// Common context keys
pub mod keys {
    /// Nested style profile object (`{{content_style_profile.name}}`)
    pub const STYLE_PROFILE: &str = "content_style_profile";
    /// Form value selecting a style profile by id
    pub const STYLE_PROFILE_ID: &str = "content_style_profile_id";
}

/// Name to value mapping supplied at render time
///
/// Values may be scalars or nested objects reachable through dotted paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderContext {
    values: Map<String, Value>,
}

impl RenderContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON value; non-objects yield an empty context
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self { values },
            _ => Self::default(),
        }
    }

    /// Build a context from plain string form values
    pub fn from_form<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Self { values }
    }

    /// Set a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Expose a style profile as `content_style_profile`
    ///
    /// The profile's `json_payload` fields are flattened next to `id` and
    /// `name`, so both `{{content_style_profile.name}}` and
    /// `{{content_style_profile.tone}}` resolve.
    pub fn with_style_profile(mut self, profile: &StyleProfile) -> Self {
        self.insert(keys::STYLE_PROFILE, profile.to_context_value());
        self
    }

    /// Top-level lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Dotted path lookup (`a.b.c`)
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Whether `key` is set to a non-blank value
    pub fn is_filled(&self, key: &str) -> bool {
        match self.get_path(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for RenderContext {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}
