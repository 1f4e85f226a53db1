//! Style profiles and prompt log history

use studio_store::{Order, Query, from_row, from_rows, tables};
use studio_template::{PromptLog, StyleProfile};
use tracing::instrument;

use crate::error::{Result, ServiceError};
use crate::service::StudioService;

const MAX_LOGS_PER_PAGE: usize = 100;

impl StudioService {
    /// Every style profile, by id
    #[instrument(skip(self))]
    pub async fn style_profiles(&self) -> Result<Vec<StyleProfile>> {
        let rows = self
            .store
            .select(tables::STYLE_PROFILES, &Query::all().order_by("id", Order::Asc))
            .await?;
        Ok(from_rows(rows)?)
    }

    /// Style profile `id`
    #[instrument(skip(self))]
    pub async fn style_profile(&self, id: &str) -> Result<StyleProfile> {
        let row = self
            .store
            .select(tables::STYLE_PROFILES, &Query::all().eq("id", id).limit(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("Style profile", id))?;
        Ok(from_row(row)?)
    }

    /// Most recent prompt logs, newest first
    ///
    /// `limit` defaults to the configured page size and is capped at 100.
    #[instrument(skip(self))]
    pub async fn recent_logs(&self, limit: Option<usize>) -> Result<Vec<PromptLog>> {
        let limit = limit
            .unwrap_or(self.config.recent_logs_limit)
            .clamp(1, MAX_LOGS_PER_PAGE);
        let rows = self
            .store
            .select(
                tables::PROMPT_LOGS,
                &Query::all().order_by("created_at", Order::Desc).limit(limit),
            )
            .await?;
        Ok(from_rows(rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use studio_store::{Persistence, to_row};

    use crate::testing::seeded_service;

    #[tokio::test]
    async fn test_style_profiles() {
        let (service, _) = seeded_service();
        let profiles = service.style_profiles().await.unwrap();
        let names: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Professional", "Casual", "Technical", "Construction Expert"]);

        let expert = service.style_profile("4").await.unwrap();
        assert_eq!(expert.json_payload["industry"], "construction");

        let err = service.style_profile("9").await.unwrap_err();
        assert_eq!(err.to_string(), "Style profile '9' not found");
    }

    #[tokio::test]
    async fn test_recent_logs_newest_first() {
        let (service, store) = seeded_service();
        for (day, text) in [(1, "first"), (3, "third"), (2, "second")] {
            let record = to_row(&json!({
                "prompt_object": { "template": text },
                "result_tokens": 1,
                "cost_usd": 0.0,
                "created_at": format!("2024-05-0{day}T10:00:00Z"),
            }))
            .unwrap();
            store.insert(tables::PROMPT_LOGS, record).await.unwrap();
        }

        let logs = service.recent_logs(None).await.unwrap();
        let order: Vec<_> = logs
            .iter()
            .map(|l| l.prompt_object["template"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(order, vec!["third", "second", "first"]);

        assert_eq!(service.recent_logs(Some(2)).await.unwrap().len(), 2);
        assert_eq!(service.recent_logs(Some(0)).await.unwrap().len(), 1);
    }
}
