use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::{Map, Value};
use studio_template::{
    RenderContext, TemplateRenderer, extract_placeholders, field_hint, field_label,
};
use tracing::debug;

/// Read template text from a file, or stdin for `-`
pub fn read_template(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read template from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// `KEY=VALUE` argument parser
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Values from an optional JSON file, then `--set` assignments on top
pub fn load_context(
    vars: Option<&Path>,
    assignments: &[(String, String)],
) -> anyhow::Result<RenderContext> {
    let mut values = match vars {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match serde_json::from_str::<Value>(&raw)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
            {
                Value::Object(map) => map,
                _ => bail!("{} must contain a JSON object", path.display()),
            }
        }
        None => Map::new(),
    };

    for (key, value) in assignments {
        insert_path(&mut values, key, Value::String(value.clone()));
    }
    debug!(keys = values.len(), "Loaded render values");

    Ok(RenderContext::from(values))
}

/// Set `a.b.c`, replacing non-object intermediates
fn insert_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

pub fn render(text: &str, context: &RenderContext) -> studio_template::Result<String> {
    TemplateRenderer::new().render(text, context)
}

pub fn missing_fields(text: &str, context: &RenderContext) -> Vec<String> {
    extract_placeholders(text)
        .into_iter()
        .filter(|name| !context.is_filled(name))
        .collect()
}

/// Placeholder, label and hint for each variable
pub fn placeholder_table(text: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Placeholder", "Label", "Hint"]);

    for name in extract_placeholders(text) {
        let label = field_label(&name);
        let hint = field_hint(&name).unwrap_or_default();
        table.add_row(vec![name, label, hint.to_string()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("tone=warm and friendly").unwrap(),
            ("tone".to_string(), "warm and friendly".to_string())
        );
        assert_eq!(
            parse_assignment("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_assignments_build_nested_values() {
        let assignments = vec![
            ("user.name".to_string(), "Ada".to_string()),
            ("topic".to_string(), "engines".to_string()),
        ];
        let context = load_context(None, &assignments).unwrap();
        assert_eq!(context.get_path("user.name"), Some(&json!("Ada")));
        assert_eq!(
            render("{{user.name}} on {{topic}}", &context).unwrap(),
            "Ada on engines"
        );
    }

    #[test]
    fn test_insert_path_replaces_scalars() {
        let mut map = Map::new();
        insert_path(&mut map, "a", json!("x"));
        insert_path(&mut map, "a.b", json!("y"));
        assert_eq!(Value::Object(map), json!({"a": {"b": "y"}}));
    }

    #[test]
    fn test_missing_fields() {
        let text = "{{target_audience}} {{#if extra}}{{extra}}{{/if}}";
        let context = RenderContext::new().with("target_audience", "  ");
        assert_eq!(missing_fields(text, &context), vec!["target_audience", "extra"]);
    }

    #[test]
    fn test_placeholder_table() {
        let table = placeholder_table("For {{target_audience}} about {{topic}}").to_string();
        assert!(table.contains("Target Audience"));
        assert!(table.contains("topic"));
        assert!(table.contains("Placeholder"));
    }
}
