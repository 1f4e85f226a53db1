//! Template CRUD and cloning

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use studio_store::{Order, Query, Row, from_row, tables, to_row};
use studio_template::{Template, TemplateVariable, default_category, reconcile_text};
use tracing::{info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::service::StudioService;

/// Listing filter; both criteria are case-insensitive
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFilter {
    /// Substring of the name or description
    #[serde(default)]
    pub search: Option<String>,
    /// Exact category
    #[serde(default)]
    pub category: Option<String>,
}

impl TemplateFilter {
    fn matches(&self, template: &Template) -> bool {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        if let Some(needle) = search {
            let in_name = template.name.to_lowercase().contains(&needle);
            let in_description = template
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }

        match self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => template.effective_category().eq_ignore_ascii_case(category),
            None => true,
        }
    }
}

/// Input for [`StudioService::create_template`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
}

/// Partial update for [`StudioService::update_template`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub template: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub variables: Option<Vec<TemplateVariable>>,
}

impl StudioService {
    /// All templates matching `filter`, oldest first
    ///
    /// Rows that cannot be read as templates are skipped with a warning.
    #[instrument(skip(self))]
    pub async fn list_templates(&self, filter: &TemplateFilter) -> Result<Vec<Template>> {
        let rows = self
            .store
            .select(
                tables::TEMPLATES,
                &Query::all().order_by("created_at", Order::Asc),
            )
            .await?;

        let templates = rows
            .into_iter()
            .filter_map(|row| match from_row::<Template>(row) {
                Ok(template) => Some(template.normalized()),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable template row");
                    None
                }
            })
            .filter(|template| filter.matches(template))
            .collect();

        Ok(templates)
    }

    /// Template `id`
    #[instrument(skip(self))]
    pub async fn get_template(&self, id: &str) -> Result<Template> {
        let rows = self
            .store
            .select(tables::TEMPLATES, &Query::all().eq("id", id).limit(1))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("Template", id))?;

        Ok(from_row::<Template>(row)?.normalized())
    }

    /// Store a new template
    ///
    /// Variables are reconciled against the text, so metadata for names the
    /// text does not reference is dropped.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_template(&self, input: NewTemplate) -> Result<Template> {
        let name = required(&input.name, "Template name is required")?;
        let text = required(&input.template, "Template text is required")?;
        let variables = reconcile_text(&text, &normalize_variables(input.variables)?);
        let category = input
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map_or_else(|| default_category(&name), str::to_string);

        let record = to_row(&json!({
            "name": name,
            "description": input.description,
            "template": text,
            "category": category,
            "tags": input.tags,
            "variables": variables,
            "version": 1,
            "usage_count": 0,
            "updated_at": Utc::now(),
        }))?;

        let created = self.insert_template(record).await?;
        info!(template_id = %created.id, variables = created.variables.len(), "Template created");
        Ok(created)
    }

    /// Apply a partial update to template `id`
    #[instrument(skip(self, patch))]
    pub async fn update_template(&self, id: &str, patch: TemplatePatch) -> Result<Template> {
        let current = self.get_template(id).await?;
        let mut changes = Row::new();

        if let Some(name) = patch.name {
            let name = required(&name, "Template name cannot be empty")?;
            changes.insert("name".to_string(), Value::String(name));
        }
        if let Some(description) = patch.description {
            changes.insert("description".to_string(), Value::String(description));
        }
        if let Some(category) = patch.category {
            changes.insert("category".to_string(), Value::String(category.trim().to_string()));
        }
        if let Some(tags) = patch.tags {
            changes.insert("tags".to_string(), json!(tags));
        }

        let text_changed = patch.template.is_some();
        let text = match patch.template {
            Some(text) => required(&text, "Template text cannot be empty")?,
            None => current.template_text.clone(),
        };
        if text_changed || patch.variables.is_some() {
            let existing = match patch.variables {
                Some(variables) => normalize_variables(variables)?,
                None => current.variables.clone(),
            };
            changes.insert("variables".to_string(), json!(reconcile_text(&text, &existing)));
        }
        if text_changed {
            changes.insert("template".to_string(), Value::String(text));
        }
        changes.insert("updated_at".to_string(), json!(Utc::now()));

        let row = self.store.update(tables::TEMPLATES, id, changes).await?;
        let updated = from_row::<Template>(row)?.normalized();
        info!(template_id = %updated.id, "Template updated");
        Ok(updated)
    }

    /// Remove template `id`
    #[instrument(skip(self))]
    pub async fn delete_template(&self, id: &str) -> Result<()> {
        self.store.delete(tables::TEMPLATES, id).await?;
        info!(template_id = id, "Template deleted");
        Ok(())
    }

    /// Copy template `id` under a new name
    ///
    /// The copy records its source in `parent_id` and starts over at version 1
    /// with no usage.
    #[instrument(skip(self))]
    pub async fn clone_template(&self, id: &str, name: Option<String>) -> Result<Template> {
        let source = self.get_template(id).await?;
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("{} (Copy)", source.name));

        let record = to_row(&json!({
            "name": name,
            "description": source.description,
            "template": source.template_text,
            "category": source.category,
            "tags": source.tags,
            "variables": source.variables,
            "version": 1,
            "usage_count": 0,
            "parent_id": source.id,
            "updated_at": Utc::now(),
        }))?;

        let copy = self.insert_template(record).await?;
        info!(template_id = %copy.id, parent_id = %source.id, "Template cloned");
        Ok(copy)
    }

    async fn insert_template(&self, record: Row) -> Result<Template> {
        let row = self.store.insert(tables::TEMPLATES, record).await?;
        Ok(from_row::<Template>(row)?.normalized())
    }
}

fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::validation(message))
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn normalize_variables(variables: Vec<TemplateVariable>) -> Result<Vec<TemplateVariable>> {
    variables
        .into_iter()
        .map(|v| v.normalized().map_err(ServiceError::from))
        .collect()
}
