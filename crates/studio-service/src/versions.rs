//! Append-only template versions

use serde::Deserialize;
use serde_json::json;
use studio_store::{Order, Query, from_row, tables, to_row};
use studio_template::{TemplateVariable, TemplateVersion, reconcile_text};
use tracing::{info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::service::StudioService;
use crate::templates::normalize_variables;

/// Input for [`StudioService::create_version`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewVersion {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
}

impl StudioService {
    /// Versions of `template_id`, newest first
    #[instrument(skip(self))]
    pub async fn list_versions(&self, template_id: &str) -> Result<Vec<TemplateVersion>> {
        self.get_template(template_id).await?;

        let rows = self
            .store
            .select(
                tables::TEMPLATE_VERSIONS,
                &Query::all()
                    .eq("template_id", template_id)
                    .order_by("version", Order::Desc),
            )
            .await?;

        Ok(studio_store::from_rows(rows)?)
    }

    /// Snapshot new text for `template_id` as the next version
    ///
    /// The template's own `version` is moved to the new number; a failure
    /// there is logged and does not undo the snapshot.
    #[instrument(skip(self, input))]
    pub async fn create_version(
        &self,
        template_id: &str,
        input: NewVersion,
    ) -> Result<TemplateVersion> {
        if input.template.trim().is_empty() {
            return Err(ServiceError::validation("Template text is required"));
        }
        let template = self.get_template(template_id).await?;

        let latest = self
            .store
            .select(
                tables::TEMPLATE_VERSIONS,
                &Query::all()
                    .eq("template_id", template_id)
                    .order_by("version", Order::Desc)
                    .limit(1),
            )
            .await?;
        let next = latest
            .into_iter()
            .next()
            .and_then(|row| row.get("version").and_then(serde_json::Value::as_u64))
            .map_or(1, |v| v as u32 + 1);

        let existing = if input.variables.is_empty() {
            template.variables
        } else {
            normalize_variables(input.variables)?
        };
        let variables = reconcile_text(&input.template, &existing);

        let record = to_row(&json!({
            "template_id": template.id,
            "version": next,
            "template": input.template,
            "variables": variables,
        }))?;
        let row = self.store.insert(tables::TEMPLATE_VERSIONS, record).await?;
        let version: TemplateVersion = from_row(row)?;

        let bump = to_row(&json!({ "version": next }))?;
        if let Err(e) = self.store.update(tables::TEMPLATES, template_id, bump).await {
            warn!(template_id, version = next, error = %e, "Failed to bump template version");
        }

        info!(template_id, version = next, "Template version created");
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_service;

    fn text(template: &str) -> NewVersion {
        NewVersion {
            template: template.to_string(),
            variables: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_versions_are_numbered_and_listed_newest_first() {
        let (service, _) = seeded_service();
        assert!(service.list_versions("1").await.unwrap().is_empty());

        let first = service.create_version("1", text("v1 {{topic}}")).await.unwrap();
        let second = service.create_version("1", text("v2 {{topic}} {{tone}}")).await.unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(second.template_id, "1");

        let versions = service.list_versions("1").await.unwrap();
        assert_eq!(
            versions.iter().map(|v| v.version).collect::<Vec<_>>(),
            vec![2, 1]
        );

        let template = service.get_template("1").await.unwrap();
        assert_eq!(template.version, 2);
    }

    #[tokio::test]
    async fn test_version_variables_follow_text() {
        let (service, _) = seeded_service();
        let version = service
            .create_version("2", text("Sell {{content_type}} to {{region}}"))
            .await
            .unwrap();

        let names: Vec<_> = version.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["content_type", "region"]);
    }

    #[tokio::test]
    async fn test_versions_are_per_template() {
        let (service, _) = seeded_service();
        service.create_version("1", text("a")).await.unwrap();
        let other = service.create_version("2", text("b")).await.unwrap();
        assert_eq!(other.version, 1);
        assert_eq!(service.list_versions("2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_version_validation() {
        let (service, _) = seeded_service();
        assert!(matches!(
            service.create_version("1", text("  ")).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service.create_version("missing", text("x")).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            service.list_versions("missing").await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
