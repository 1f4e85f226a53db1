//! Placeholder analysis with optional model-written metadata

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use studio_llm::{CompletionRequest, Message};
use studio_template::{
    RenderContext, TemplateVariable, VariableType, extract_placeholders, reconcile,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::service::StudioService;

const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert prompt engineer. \
    You describe template variables precisely and answer with JSON only.";

const ANALYSIS_PROMPT: &str = "The prompt template below uses these placeholders:
{{#each names}}
- {{this}}
{{/each}}

For each placeholder return an object with:
- \"name\": the placeholder exactly as written
- \"description\": one short sentence telling the user what to enter
- \"type\": \"text\", \"number\" or \"select\"
- \"options\": for \"select\" only, the list of choices

Answer with a JSON array of these objects and nothing else.

Template:
{{text}}";

/// Where variable metadata came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// The completion model described new variables
    Ai,
    /// Extraction and reconciliation only
    Heuristic,
}

/// Result of [`StudioService::analyze`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateAnalysis {
    #[serde(rename = "detectedVariables")]
    pub detected_variables: Vec<TemplateVariable>,
    #[serde(rename = "processedText")]
    pub processed_text: String,
    pub source: AnalysisSource,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "type")]
    var_type: Option<VariableType>,
    #[serde(default)]
    options: Option<Vec<String>>,
}

impl StudioService {
    /// Detect the variables of `text`
    ///
    /// Names always come from extraction, and metadata in `existing` is kept
    /// for names still present. With a completion provider, variables that are
    /// new to this text get model-written descriptions and types; any failure
    /// there falls back to default metadata.
    #[instrument(skip(self, text, existing), fields(len = text.len()))]
    pub async fn analyze(
        &self,
        text: &str,
        existing: &[TemplateVariable],
    ) -> Result<TemplateAnalysis> {
        if text.trim().is_empty() {
            return Err(ServiceError::validation("Template text is required"));
        }

        let names = extract_placeholders(text);
        let mut variables = reconcile(&names, existing);
        let mut source = AnalysisSource::Heuristic;

        if !names.is_empty() && self.completion.is_some() {
            match self.suggest_metadata(text, &names).await {
                Ok(suggestions) => {
                    let enriched = enrich(&mut variables, existing, suggestions);
                    info!(enriched, "Applied model suggestions");
                    source = AnalysisSource::Ai;
                }
                Err(e) => {
                    warn!(error = %e, "Model analysis failed; using extracted defaults");
                }
            }
        }

        Ok(TemplateAnalysis {
            detected_variables: variables,
            processed_text: text.to_string(),
            source,
        })
    }

    async fn suggest_metadata(&self, text: &str, names: &[String]) -> Result<Vec<Suggestion>> {
        let provider = self
            .completion
            .as_ref()
            .ok_or(ServiceError::CompletionUnavailable)?;

        let context = RenderContext::new()
            .with("names", names.to_vec())
            .with("text", text);
        let prompt = self.renderer.render(ANALYSIS_PROMPT, &context)?;

        let request = CompletionRequest::builder(self.config.model.clone())
            .system(ANALYSIS_SYSTEM_PROMPT)
            .add_message(Message::user(prompt))
            .max_tokens(self.config.max_completion_tokens)
            .temperature(0.0)
            .build();

        let response = provider.complete(request).await?;
        debug!(chars = response.text().len(), "Analysis reply received");
        parse_suggestions(response.text())
    }
}

/// Apply suggestions to variables the caller had no metadata for
fn enrich(
    variables: &mut [TemplateVariable],
    existing: &[TemplateVariable],
    suggestions: Vec<Suggestion>,
) -> usize {
    let mut by_name: HashMap<String, Suggestion> = suggestions
        .into_iter()
        .map(|s| (s.name.trim().to_string(), s))
        .collect();

    let mut enriched = 0;
    for variable in variables.iter_mut() {
        if existing.iter().any(|e| e.name == variable.name) {
            continue;
        }
        let Some(suggestion) = by_name.remove(&variable.name) else {
            continue;
        };

        let mut candidate = variable.clone();
        if let Some(description) = suggestion.description.filter(|d| !d.trim().is_empty()) {
            candidate.description = description.trim().to_string();
        }
        if let Some(var_type) = suggestion.var_type {
            candidate.var_type = var_type;
        }
        candidate.options = suggestion.options;

        match candidate.normalized() {
            Ok(candidate) => {
                *variable = candidate;
                enriched += 1;
            }
            Err(e) => debug!(name = %variable.name, error = %e, "Ignoring suggestion"),
        }
    }
    enriched
}

/// Read a JSON array of suggestions, tolerating code fences and prose
fn parse_suggestions(reply: &str) -> Result<Vec<Suggestion>> {
    let start = reply.find('[');
    let end = reply.rfind(']');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => {
            return Err(ServiceError::Internal(
                "analysis reply contained no JSON array".to_string(),
            ));
        }
    };

    serde_json::from_str(json)
        .map_err(|e| ServiceError::Internal(format!("analysis reply was not valid JSON: {e}")))
}
