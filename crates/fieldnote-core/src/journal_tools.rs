//! Journal tools: the one side-effecting tool (`save_note`) and the
//! read-only recent-notes listing.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use fieldnote_provider::ToolDef;
use fieldnote_schema::Note;
use fieldnote_store::JournalStore;

use crate::tool::{limit_arg, opt_str_arg, ToolExecutor};

const HEADLINE_CHARS: usize = 100;
/// Real summarization runs in a separate downstream job; new notes carry
/// this placeholder until it does.
const SUMMARY_PLACEHOLDER: &str = "Summary pending.";

pub struct SaveNoteTool {
    store: JournalStore,
}

impl SaveNoteTool {
    pub fn new(store: JournalStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolExecutor for SaveNoteTool {
    fn definition(&self) -> ToolDef {
        ToolDef {
            name: "save_note".into(),
            description: "Save a journal note for the site owner. Content is required; \
                          tags, mood, and quick_type are optional."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "The note text to store verbatim"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Topic tags"
                    },
                    "mood": {
                        "type": "string",
                        "description": "Optional mood marker, e.g. 'focused'"
                    },
                    "quick_type": {
                        "type": "string",
                        "description": "Kind of entry (default 'note')"
                    }
                },
                "required": ["content"]
            }),
        }
    }

    async fn execute(&self, input: serde_json::Value) -> Result<serde_json::Value> {
        let Some(content) = opt_str_arg(&input, "content") else {
            bail!("content must be a non-empty string");
        };

        let tags: Vec<String> = input
            .get("tags")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|t| t.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let note = Note {
            id: Uuid::new_v4(),
            headline: content.chars().take(HEADLINE_CHARS).collect(),
            summary: SUMMARY_PLACEHOLDER.to_string(),
            content,
            tags,
            mood: opt_str_arg(&input, "mood"),
            quick_type: opt_str_arg(&input, "quick_type").unwrap_or_else(|| "note".to_string()),
            created_at: Utc::now(),
        };

        self.store.insert_note(note.clone()).await?;

        Ok(json!({
            "id": note.id,
            "headline": note.headline,
            "quick_type": note.quick_type,
            "created_at": note.created_at.to_rfc3339(),
        }))
    }
}

pub struct RecentNotesTool {
    store: JournalStore,
}

impl RecentNotesTool {
    pub fn new(store: JournalStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolExecutor for RecentNotesTool {
    fn definition(&self) -> ToolDef {
        ToolDef {
            name: "get_recent_notes".into(),
            description: "List the most recent journal notes (headline and summary only, \
                          no full content), newest first."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "description": "Max notes, 1-20 (default 5)"
                    }
                }
            }),
        }
    }

    async fn execute(&self, input: serde_json::Value) -> Result<serde_json::Value> {
        let limit = limit_arg(&input, 5, 20);
        let notes = self.store.recent_notes(limit).await?;
        Ok(json!({
            "count": notes.len(),
            "notes": notes
                .iter()
                .map(|n| json!({
                    "id": n.id,
                    "headline": n.headline,
                    "summary": n.summary,
                    "tags": n.tags,
                    "mood": n.mood,
                    "quick_type": n.quick_type,
                    "created_at": n.created_at.to_rfc3339(),
                }))
                .collect::<Vec<_>>(),
        }))
    }
}
