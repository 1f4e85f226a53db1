//! Variable-driven form state

use std::collections::HashMap;

use serde::Serialize;

use crate::context::RenderContext;
use crate::placeholder::extract_placeholders;

/// Input values for the placeholders of one selected template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    placeholders: Vec<String>,
    values: HashMap<String, String>,
}

/// One rendered form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    pub value: String,
    pub completed: bool,
}

impl FormState {
    /// Empty form for the given placeholders
    pub fn for_placeholders(placeholders: Vec<String>) -> Self {
        Self {
            placeholders,
            values: HashMap::new(),
        }
    }

    /// Empty form for the placeholders of `text`
    pub fn for_template(text: &str) -> Self {
        Self::for_placeholders(extract_placeholders(text))
    }

    /// Switch to another template; every previous value is discarded,
    /// including values whose names reappear.
    pub fn select_template(&mut self, placeholders: Vec<String>) {
        self.placeholders = placeholders;
        self.values.clear();
    }

    /// Set the value for a field
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Current value of a field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Placeholders of the selected template
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Placeholders whose value is absent or blank, in placeholder order
    pub fn missing_fields(&self) -> Vec<&str> {
        self.placeholders
            .iter()
            .filter(|p| !self.is_filled(p))
            .map(String::as_str)
            .collect()
    }

    /// Whether every placeholder has a non-blank value
    pub fn is_complete(&self) -> bool {
        self.placeholders.iter().all(|p| self.is_filled(p))
    }

    fn is_filled(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|v| !v.trim().is_empty())
    }

    /// Field descriptors for display
    pub fn fields(&self) -> Vec<FormField> {
        self.placeholders
            .iter()
            .map(|name| FormField {
                name: name.clone(),
                label: field_label(name),
                hint: field_hint(name),
                value: self.values.get(name).cloned().unwrap_or_default(),
                completed: self.is_filled(name),
            })
            .collect()
    }

    /// Values as a render context
    pub fn to_context(&self) -> RenderContext {
        RenderContext::from_form(&self.values)
    }
}

/// `snake_case` to `Title Case`
pub fn field_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Guidance shown under well-known fields
pub fn field_hint(name: &str) -> Option<&'static str> {
    match name {
        "content_type" => Some(
            "The format of content you want to create (e.g., blog post, email, video script)",
        ),
        "target_audience" => Some(
            "Who will consume this content (e.g., contractors, homeowners, project managers)",
        ),
        "stated_purpose" => Some("The primary goal of this content (e.g., educate, persuade, inform)"),
        "content_style_profile_id" => Some("The tone and voice for your content"),
        "intended_outcome" => Some(
            "What action you want the audience to take (e.g., contact sales, download guide)",
        ),
        _ => None,
    }
}
