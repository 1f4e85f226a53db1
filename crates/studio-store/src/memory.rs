//! In-process backend
//!
//! Used when no hosted database is configured, and as the test double for
//! the service and HTTP layers. [`MemoryBackend::seeded`] starts with the
//! development style profiles and templates.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::persistence::{BackendMode, Persistence, Row, row_id, tables};
use crate::query::Query;

/// Tables held in memory behind a single lock
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryBackend {
    /// Empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend preloaded with development data
    pub fn seeded() -> Self {
        let now = Value::String(Utc::now().to_rfc3339());
        let mut data = HashMap::new();

        let profiles = [
            ("1", "Professional", json!({"tone": "professional", "formality": "high"})),
            ("2", "Casual", json!({"tone": "casual", "formality": "low"})),
            ("3", "Technical", json!({"tone": "technical", "formality": "high"})),
            (
                "4",
                "Construction Expert",
                json!({"tone": "authoritative", "formality": "medium", "industry": "construction"}),
            ),
        ];
        data.insert(
            tables::STYLE_PROFILES.to_string(),
            profiles
                .into_iter()
                .map(|(id, name, payload)| object(json!({"id": id, "name": name, "json_payload": payload})))
                .collect(),
        );

        data.insert(
            tables::TEMPLATES.to_string(),
            SEED_TEMPLATES
                .iter()
                .map(|(id, name, text)| {
                    object(json!({
                        "id": id,
                        "name": name,
                        "description": "",
                        "template": text,
                        "tags": [],
                        "variables": [],
                        "version": 1,
                        "usage_count": 0,
                        "created_at": now,
                        "updated_at": now,
                    }))
                })
                .collect(),
        );

        Self {
            tables: RwLock::new(data),
        }
    }

    /// Number of rows in a table
    pub async fn count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }
}

#[async_trait]
impl Persistence for MemoryBackend {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        let tables = self.tables.read().await;
        let rows = tables.get(table).cloned().unwrap_or_default();
        Ok(query.apply(rows))
    }

    async fn insert(&self, table: &str, mut record: Row) -> Result<Row> {
        if row_id(&record).is_none() {
            record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        if record.get("created_at").is_none_or(Value::is_null) {
            record.insert(
                "created_at".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        rows.push(record.clone());
        debug!(table, rows = rows.len(), "Inserted row");

        Ok(record)
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Row> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r).as_deref() == Some(id)))
            .ok_or_else(|| StoreError::not_found(table, id))?;

        for (key, value) in patch {
            if key != "id" {
                row.insert(key, value);
            }
        }

        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::not_found(table, id))?;

        let before = rows.len();
        rows.retain(|r| row_id(r).as_deref() != Some(id));
        if rows.len() == before {
            return Err(StoreError::not_found(table, id));
        }

        Ok(())
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Memory
    }
}

fn object(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

const SEED_TEMPLATES: [(&str, &str, &str); 5] = [
    (
        "1",
        "Content Creation",
        "Draft a {{content_type}} for {{target_audience}} with the purpose of {{stated_purpose}}. Use a {{content_style_profile_id}} tone and aim for {{intended_outcome}}. Think step by step before creating your first draft.",
    ),
    (
        "2",
        "Marketing Copy",
        "Create {{content_type}} marketing copy targeting {{target_audience}}. The goal is to {{stated_purpose}} while maintaining a {{content_style_profile_id}} voice. The copy should drive {{intended_outcome}}.",
    ),
    (
        "3",
        "Construction Project Brief",
        "Create a construction project brief for a {{project_type}} project. The client is a {{client_type}} and the project scope includes {{project_scope}}. Use a {{content_style_profile_id}} tone and include important considerations for {{key_consideration}}. The final deliverable should address {{project_timeline}} timeline constraints.",
    ),
    (
        "4",
        "Material Specification",
        "Write a detailed specification for {{material_type}} to be used in a {{application_context}}. The specifications must meet {{standard_requirements}} and be suitable for {{environmental_conditions}}. Use a {{content_style_profile_id}} tone appropriate for construction professionals.",
    ),
    (
        "5",
        "Safety Procedure",
        "Create a safety procedure for {{activity_type}} on a construction site. Include necessary {{equipment_needed}} and precautions for {{risk_factors}}. This document will be used by {{target_audience}} and should use a {{content_style_profile_id}} tone. Focus on compliance with {{regulation_standards}}.",
    ),
];
