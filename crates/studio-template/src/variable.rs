//! Variable metadata and reconciliation against template text

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, TemplateError};

/// Input kind offered for a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Text,
    Number,
    Select,
}

/// Metadata for one placeholder of a template
///
/// The `name` is the identity used during reconciliation; `id` is only a
/// stable handle for clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl TemplateVariable {
    /// Default metadata for a newly detected placeholder
    pub fn detected(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4().to_string(),
            description: format!("Value for {name}"),
            name,
            var_type: VariableType::Text,
            default_value: None,
            options: None,
        }
    }

    /// Check type/options consistency
    ///
    /// Options are required for `select` and dropped for every other type.
    pub fn normalized(mut self) -> Result<Self> {
        if self.name.trim().is_empty() {
            return Err(TemplateError::InvalidVariable {
                name: self.name,
                detail: "name must not be empty".to_string(),
            });
        }

        match self.var_type {
            VariableType::Select => {
                let has_options = self
                    .options
                    .as_ref()
                    .is_some_and(|opts| opts.iter().any(|o| !o.trim().is_empty()));
                if !has_options {
                    return Err(TemplateError::InvalidVariable {
                        name: self.name,
                        detail: "select variables require at least one option".to_string(),
                    });
                }
            }
            VariableType::Text | VariableType::Number => self.options = None,
        }

        if matches!(self.default_value, Some(Value::Null)) {
            self.default_value = None;
        }

        Ok(self)
    }
}

/// Merge freshly extracted names with previously stored metadata.
///
/// - names with stored metadata keep it unchanged (id included)
/// - new names get default metadata and a fresh id
/// - stored entries whose name is no longer referenced are dropped
///
/// The result follows the order of `names`. Renaming a placeholder in the text
/// therefore discards the old entry's metadata.
pub fn reconcile<S: AsRef<str>>(names: &[S], existing: &[TemplateVariable]) -> Vec<TemplateVariable> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            existing
                .iter()
                .find(|var| var.name == name)
                .cloned()
                .unwrap_or_else(|| TemplateVariable::detected(name))
        })
        .collect()
}

/// Extract placeholders from `text` and reconcile them with `existing`
pub fn reconcile_text(text: &str, existing: &[TemplateVariable]) -> Vec<TemplateVariable> {
    reconcile(&crate::extract_placeholders(text), existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn var(id: &str, name: &str, var_type: VariableType) -> TemplateVariable {
        TemplateVariable {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("About {name}"),
            var_type,
            default_value: None,
            options: None,
        }
    }

    #[test]
    fn test_reconcile_preserves_identity() {
        let existing = vec![var("x1728", "foo", VariableType::Number)];
        let result = reconcile(&["foo", "bar"], &existing);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0], existing[0]);
        assert_eq!(result[1].name, "bar");
        assert_eq!(result[1].var_type, VariableType::Text);
        assert_eq!(result[1].description, "Value for bar");
        assert_eq!(result[1].options, None);
        assert_ne!(result[1].id, "x1728");
    }

    #[test]
    fn test_reconcile_prunes_stale() {
        let existing = vec![
            var("1", "foo", VariableType::Text),
            var("2", "stale", VariableType::Text),
        ];
        let result = reconcile(&["foo"], &existing);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "foo");
    }

    #[test]
    fn test_reconcile_follows_name_order() {
        let existing = vec![
            var("1", "a", VariableType::Text),
            var("2", "b", VariableType::Text),
        ];
        let result = reconcile(&["b", "c", "a"], &existing);
        let names: Vec<_> = result.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(result[0].id, "2");
        assert_eq!(result[2].id, "1");
    }

    #[test]
    fn test_reconcile_rename_loses_metadata() {
        let existing = vec![var("1", "old_name", VariableType::Number)];
        let result = reconcile(&["new_name"], &existing);
        assert_eq!(result[0].var_type, VariableType::Text);
        assert_ne!(result[0].id, "1");
    }

    #[test]
    fn test_detected_ids_are_unique() {
        let result = reconcile(&["a", "b"], &[]);
        assert_ne!(result[0].id, result[1].id);
    }

    #[test]
    fn test_reconcile_text() {
        let existing = vec![var("keep", "topic", VariableType::Select)];
        let result = reconcile_text("Write about {{topic}} for {{audience}}", &existing);
        assert_eq!(result[0].id, "keep");
        assert_eq!(result[1].name, "audience");
    }

    #[test]
    fn test_normalized_select_requires_options() {
        let select = var("1", "tone", VariableType::Select);
        assert!(matches!(
            select.clone().normalized(),
            Err(TemplateError::InvalidVariable { .. })
        ));

        let with_options = TemplateVariable {
            options: Some(vec!["formal".to_string(), "casual".to_string()]),
            ..select
        };
        assert!(with_options.normalized().is_ok());
    }

    #[test]
    fn test_normalized_drops_options_on_text() {
        let text = TemplateVariable {
            options: Some(vec!["x".to_string()]),
            default_value: Some(Value::Null),
            ..var("1", "topic", VariableType::Text)
        };
        let normalized = text.normalized().unwrap();
        assert_eq!(normalized.options, None);
        assert_eq!(normalized.default_value, None);
    }

    #[test]
    fn test_serde_field_names() {
        let parsed: TemplateVariable = serde_json::from_value(json!({
            "id": "v1",
            "name": "count",
            "description": "How many",
            "type": "number",
            "default_value": 3
        }))
        .unwrap();
        assert_eq!(parsed.var_type, VariableType::Number);
        assert_eq!(parsed.default_value, Some(json!(3)));

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["type"], "number");
        assert!(value.get("options").is_none());
    }
}
