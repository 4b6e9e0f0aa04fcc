//! Tool execution framework.
//!
//! A closed registry maps each catalog name to exactly one handler. Every
//! run produces a uniform [`ToolOutcome`]; handler failures and unknown
//! names become `{success: false, error}` data for the model, never an
//! error across the registry boundary.

use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fieldnote_provider::ToolDef;

/// Uniform result shape handed back to the model for every invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Trait for operations the model may invoke during an exchange.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// The catalog entry (name, description, JSON schema) published to the
    /// model. Names, required fields, and types are a stable contract.
    fn definition(&self) -> ToolDef;

    /// Execute with already-parsed JSON arguments. Errors are reported to
    /// the model by the registry, not raised.
    async fn execute(&self, input: serde_json::Value) -> Result<serde_json::Value>;
}

pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn ToolExecutor>>,
}

impl ToolRegistry {
    /// Builds a registry, rejecting duplicate names up front so a catalog
    /// collision is a startup error rather than a silent overwrite.
    pub fn with_tools(tools: Vec<Box<dyn ToolExecutor>>) -> Result<Self> {
        let mut map: HashMap<String, Box<dyn ToolExecutor>> = HashMap::new();
        for tool in tools {
            let name = tool.definition().name;
            if map.insert(name.clone(), tool).is_some() {
                bail!("duplicate tool name: {name}");
            }
        }
        Ok(Self { tools: map })
    }

    pub fn definitions(&self) -> Vec<ToolDef> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool by name. Infallible by design: whatever goes wrong comes
    /// back as a failed outcome the model can react to.
    pub async fn run(&self, name: &str, input: serde_json::Value) -> ToolOutcome {
        let Some(tool) = self.tools.get(name) else {
            return ToolOutcome::failure(format!("Unknown tool: {name}"));
        };
        match tool.execute(input).await {
            Ok(data) => ToolOutcome::ok(data),
            Err(e) => {
                tracing::warn!("tool {name} failed: {e:#}");
                ToolOutcome::failure(e.to_string())
            }
        }
    }
}

/// Optional string argument: present, trimmed, non-empty.
pub(crate) fn opt_str_arg(input: &serde_json::Value, key: &str) -> Option<String> {
    input
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Limit argument clamped to `1..=max`, falling back to `default` when
/// absent or not a number.
pub(crate) fn limit_arg(input: &serde_json::Value, default: usize, max: usize) -> usize {
    input
        .get("limit")
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .unwrap_or(default)
        .clamp(1, max)
}
