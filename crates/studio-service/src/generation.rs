//! Preview and prompt submission

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use studio_llm::{CompletionRequest, Message, TokenUsage};
use studio_store::{tables, to_row};
use studio_template::{PromptLog, RenderContext, StyleProfile, extract_placeholders, keys};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::service::StudioService;

/// Input for [`StudioService::preview`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub template: String,
    #[serde(default, alias = "variables")]
    pub values: Map<String, Value>,
    #[serde(default)]
    pub style_profile_id: Option<String>,
}

/// Rendered text plus form completeness
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    /// Output, or the render error sentinel
    pub rendered: String,
    pub placeholders: Vec<String>,
    pub missing_fields: Vec<String>,
    pub complete: bool,
    pub character_count: usize,
}

/// Input for [`StudioService::generate`]
///
/// The text comes from `template_id` when given, otherwise from `template`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default, alias = "variables")]
    pub values: Map<String, Value>,
    #[serde(default)]
    pub style_profile_id: Option<String>,
}

/// Outcome of a prompt submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    /// Rendered prompt as sent
    pub prompt: String,
    /// Model reply
    pub result: String,
    pub model: String,
    pub usage: TokenUsage,
    pub result_tokens: u64,
    pub cost_usd: f64,
    /// Whether the prompt log was written
    pub logged: bool,
}

impl StudioService {
    /// Render `request.template` for display
    ///
    /// Never fails on bad template text; the rendered field holds the error
    /// sentinel instead. An explicit style profile id that does not exist is
    /// reported as not found.
    #[instrument(skip(self, request))]
    pub async fn preview(&self, request: PreviewRequest) -> Result<Preview> {
        let context = self
            .build_context(request.values, request.style_profile_id.as_deref())
            .await?;

        let rendered = self.renderer.render_or_sentinel(&request.template, &context);
        let placeholders = extract_placeholders(&request.template);
        let missing_fields: Vec<String> = placeholders
            .iter()
            .filter(|name| !context.is_filled(name))
            .cloned()
            .collect();

        Ok(Preview {
            character_count: rendered.chars().count(),
            complete: missing_fields.is_empty(),
            rendered,
            placeholders,
            missing_fields,
        })
    }

    /// Render a template and submit it to the completion model
    ///
    /// A prompt that cannot be rendered is never sent. After a successful
    /// completion the prompt log and the template's usage count are written
    /// best-effort.
    #[instrument(skip(self, request), fields(template_id = ?request.template_id))]
    pub async fn generate(&self, request: GenerateRequest) -> Result<Generation> {
        let template = match request.template_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Some(self.get_template(id).await?),
            None => None,
        };
        let text = match (&template, request.template.as_deref()) {
            (Some(template), _) => template.template_text.clone(),
            (None, Some(text)) if !text.trim().is_empty() => text.to_string(),
            _ => {
                return Err(ServiceError::validation(
                    "Either template_id or template text is required",
                ));
            }
        };

        let context = self
            .build_context(request.values, request.style_profile_id.as_deref())
            .await?;
        let prompt = self.renderer.render(&text, &context)?;

        let provider = self
            .completion
            .as_ref()
            .ok_or(ServiceError::CompletionUnavailable)?;
        let completion = CompletionRequest::builder(self.config.model.clone())
            .add_message(Message::user(prompt.clone()))
            .max_tokens(self.config.max_completion_tokens)
            .build();

        debug!(provider = provider.name(), chars = prompt.len(), "Submitting prompt");
        let response = provider.complete(completion).await?;
        let result = response.text().to_string();

        let log = PromptLog::estimate(
            json!({ "template": text, "variables": context }),
            &result,
            self.config.cost_per_1k_tokens,
        );
        let logged = match self.write_log(&log).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to write prompt log");
                false
            }
        };

        if let Some(template) = &template {
            let patch = to_row(&json!({ "usage_count": template.usage_count + 1 }))?;
            if let Err(e) = self.store.update(tables::TEMPLATES, &template.id, patch).await {
                warn!(template_id = %template.id, error = %e, "Failed to update usage count");
            }
        }

        info!(
            result_tokens = log.result_tokens,
            cost_usd = log.cost_usd,
            logged,
            "Prompt generated"
        );

        Ok(Generation {
            prompt,
            result,
            model: self.config.model.clone(),
            usage: response.usage,
            result_tokens: log.result_tokens,
            cost_usd: log.cost_usd,
            logged,
        })
    }

    async fn write_log(&self, log: &PromptLog) -> Result<()> {
        self.store.insert(tables::PROMPT_LOGS, to_row(log)?).await?;
        Ok(())
    }

    /// Form values plus the chosen style profile under `content_style_profile`
    async fn build_context(
        &self,
        values: Map<String, Value>,
        style_profile_id: Option<&str>,
    ) -> Result<RenderContext> {
        let context = RenderContext::from(values);
        match self.resolve_style_profile(style_profile_id, &context).await? {
            Some(profile) => Ok(context.with_style_profile(&profile)),
            None => Ok(context),
        }
    }

    /// An explicit id must exist; an id taken from the form values is
    /// ignored when it matches no profile.
    async fn resolve_style_profile(
        &self,
        explicit: Option<&str>,
        context: &RenderContext,
    ) -> Result<Option<StyleProfile>> {
        if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
            return self.style_profile(id).await.map(Some);
        }

        let from_form = match context.get(keys::STYLE_PROFILE_ID) {
            Some(Value::String(id)) if !id.trim().is_empty() => id.trim().to_string(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Ok(None),
        };
        match self.style_profile(&from_form).await {
            Ok(profile) => Ok(Some(profile)),
            Err(ServiceError::NotFound { .. }) => {
                debug!(id = %from_form, "Form value names no style profile");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CannedProvider, MockStore, seeded_service, service_with};
    use crate::{ServiceConfig, StudioService};
    use std::sync::Arc;
    use studio_store::{BackendMode, Persistence, Query, StoreError};
    use studio_template::RENDER_ERROR_SENTINEL;

    fn values(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect()
    }

    #[tokio::test]
    async fn test_preview_reports_missing_fields() {
        let (service, _) = seeded_service();
        let preview = service
            .preview(PreviewRequest {
                template: "Hello {{name}}, welcome to {{place}}".to_string(),
                values: values(&[("name", "Ada")]),
                style_profile_id: None,
            })
            .await
            .unwrap();

        assert_eq!(preview.rendered, "Hello Ada, welcome to ");
        assert_eq!(preview.missing_fields, vec!["place".to_string()]);
        assert!(!preview.complete);
        assert_eq!(preview.character_count, preview.rendered.chars().count());
    }

    #[tokio::test]
    async fn test_preview_uses_sentinel_for_bad_text() {
        let (service, _) = seeded_service();
        let preview = service
            .preview(PreviewRequest {
                template: "{{#if open}}never closed".to_string(),
                ..PreviewRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(preview.rendered, RENDER_ERROR_SENTINEL);
    }

    #[tokio::test]
    async fn test_preview_style_profile() {
        let (service, _) = seeded_service();
        let request = PreviewRequest {
            template: "{{content_style_profile.name}} / {{content_style_profile.tone}}".to_string(),
            values: values(&[("content_style_profile_id", "2")]),
            style_profile_id: None,
        };
        let preview = service.preview(request).await.unwrap();
        assert_eq!(preview.rendered, "Casual / casual");
        assert!(preview.complete);

        let request = PreviewRequest {
            template: "{{content_style_profile.name}}".to_string(),
            values: values(&[("content_style_profile_id", "missing")]),
            style_profile_id: None,
        };
        assert_eq!(service.preview(request).await.unwrap().rendered, "");

        let request = PreviewRequest {
            template: "x".to_string(),
            style_profile_id: Some("missing".to_string()),
            ..PreviewRequest::default()
        };
        assert!(matches!(
            service.preview(request).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_from_template_id() {
        let provider = CannedProvider::replying("Here is your draft.");
        let (service, store) = service_with(provider.clone());

        let generation = service
            .generate(GenerateRequest {
                template_id: Some("1".to_string()),
                values: values(&[
                    ("content_type", "blog post"),
                    ("target_audience", "site managers"),
                    ("content_style_profile_id", "1"),
                ]),
                ..GenerateRequest::default()
            })
            .await
            .unwrap();

        assert_eq!(generation.result, "Here is your draft.");
        assert!(generation.prompt.starts_with("Draft a blog post for site managers"));
        assert!(generation.logged);
        assert_eq!(generation.result_tokens, 5);
        assert!(generation.cost_usd > 0.0);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].text(), generation.prompt);
        assert_eq!(requests[0].model, "gpt-4o");

        assert_eq!(store.count(tables::PROMPT_LOGS).await, 1);
        let template = service.get_template("1").await.unwrap();
        assert_eq!(template.usage_count, 1);

        let logs = store.select(tables::PROMPT_LOGS, &Query::all()).await.unwrap();
        assert_eq!(logs[0]["prompt_object"]["variables"]["content_style_profile"]["name"], "Professional");
    }

    #[tokio::test]
    async fn test_generate_inline_text() {
        let (service, _) = service_with(CannedProvider::replying("ok"));
        let generation = service
            .generate(GenerateRequest {
                template: Some("Say {{word}}".to_string()),
                values: values(&[("word", "hi")]),
                ..GenerateRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(generation.prompt, "Say hi");
    }

    #[tokio::test]
    async fn test_generate_requires_text() {
        let (service, _) = service_with(CannedProvider::replying("ok"));
        let result = service.generate(GenerateRequest::default()).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let result = service
            .generate(GenerateRequest {
                template_id: Some("missing".to_string()),
                ..GenerateRequest::default()
            })
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unrenderable_prompt_is_not_sent() {
        let provider = CannedProvider::replying("unused");
        let (service, store) = service_with(provider.clone());

        let result = service
            .generate(GenerateRequest {
                template: Some("{{#if a}}x{{/each}}".to_string()),
                ..GenerateRequest::default()
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Render(_))));
        assert!(provider.requests().is_empty());
        assert_eq!(store.count(tables::PROMPT_LOGS).await, 0);
    }

    #[tokio::test]
    async fn test_generate_without_provider() {
        let (service, _) = seeded_service();
        let result = service
            .generate(GenerateRequest {
                template: Some("Hi".to_string()),
                ..GenerateRequest::default()
            })
            .await;
        assert!(matches!(result, Err(ServiceError::CompletionUnavailable)));
    }

    #[tokio::test]
    async fn test_completion_failure_writes_no_log() {
        let (service, store) = service_with(CannedProvider::failing("upstream down"));
        let result = service
            .generate(GenerateRequest {
                template_id: Some("2".to_string()),
                ..GenerateRequest::default()
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Completion(_))));
        assert_eq!(store.count(tables::PROMPT_LOGS).await, 0);
        assert_eq!(service.get_template("2").await.unwrap().usage_count, 0);
    }

    #[tokio::test]
    async fn test_log_failure_is_best_effort() {
        let mut store = MockStore::new();
        store.expect_select().returning(|_, _| Ok(Vec::new()));
        store.expect_insert().returning(|table, _| {
            Err(StoreError::Backend {
                status: 500,
                message: format!("{table} is read-only"),
            })
        });
        store.expect_mode().return_const(BackendMode::Rest);

        let service = StudioService::new(Arc::new(store), ServiceConfig::default())
            .with_completion(CannedProvider::replying("fine"));
        let generation = service
            .generate(GenerateRequest {
                template: Some("Hello".to_string()),
                ..GenerateRequest::default()
            })
            .await
            .unwrap();

        assert_eq!(generation.result, "fine");
        assert!(!generation.logged);
    }
}
