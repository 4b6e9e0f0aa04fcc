use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use fieldnote_provider::ToolDef;
use fieldnote_store::JournalStore;

use crate::tool::ToolExecutor;

/// Aggregate platform counters for the admin dashboard and curious
/// visitors.
pub struct PlatformStatsTool {
    store: JournalStore,
}

impl PlatformStatsTool {
    pub fn new(store: JournalStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolExecutor for PlatformStatsTool {
    fn definition(&self) -> ToolDef {
        ToolDef {
            name: "get_platform_stats".into(),
            description: "Aggregate platform counters: active notes, articles, chat \
                          messages, notes in the last 24h, defense-category articles."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, _input: serde_json::Value) -> Result<serde_json::Value> {
        let stats = self.store.platform_stats().await?;
        Ok(serde_json::to_value(stats)?)
    }
}
