use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an agent profile. Serialized camelCase on the wire
/// (`"dodPolicy"`, `"techNews"`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AgentId {
    DodPolicy,
    TechNews,
    Journal,
    Portfolio,
}

impl AgentId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DodPolicy => "dodPolicy",
            Self::TechNews => "techNews",
            Self::Journal => "journal",
            Self::Portfolio => "portfolio",
        }
    }

    /// Every known agent id, in routing-priority order.
    pub fn all() -> [AgentId; 4] {
        [
            Self::DodPolicy,
            Self::TechNews,
            Self::Journal,
            Self::Portfolio,
        ]
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of caller-owned conversation history, most-recent-last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Inbound chat payload. Callers send either a bare `message` or a full
/// `messages` history (most-recent-last); `page` is the route the user is
/// viewing and steers agent selection.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub messages: Vec<ConversationTurn>,
    #[serde(default)]
    pub page: Option<String>,
}

/// Outcome of one chat exchange, audit trail included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub agent_emoji: String,
    pub steps: Vec<AgentStep>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Thought,
    ToolCall,
    ToolResult,
    Answer,
}

/// One entry of the per-exchange audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStep {
    pub kind: StepKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl AgentStep {
    pub fn thought(content: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Thought,
            content: content.into(),
            tool: None,
            data: None,
        }
    }

    pub fn tool_call(tool: impl Into<String>, args: serde_json::Value) -> Self {
        let tool = tool.into();
        Self {
            kind: StepKind::ToolCall,
            content: format!("Calling {tool}"),
            tool: Some(tool),
            data: Some(args),
        }
    }

    pub fn tool_result(tool: impl Into<String>, outcome: serde_json::Value) -> Self {
        let tool = tool.into();
        Self {
            kind: StepKind::ToolResult,
            content: format!("Result from {tool}"),
            tool: Some(tool),
            data: Some(outcome),
        }
    }

    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Answer,
            content: content.into(),
            tool: None,
            data: None,
        }
    }
}

// ============================================================
// Store records
// ============================================================

/// Aggregated article as served back by the search tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub category: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

/// Ingest payload for one scraped article (the out-of-process scraper
/// POSTs batches of these).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub headline: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub mood: Option<String>,
    pub quick_type: String,
    pub created_at: DateTime<Utc>,
}

/// Projection of a note without its full content, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: Uuid,
    pub headline: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub mood: Option<String>,
    pub quick_type: String,
    pub created_at: DateTime<Utc>,
}

/// Counters surfaced on the admin dashboard and by `get_platform_stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformStats {
    pub total_notes: u64,
    pub total_articles: u64,
    pub total_chat_messages: u64,
    pub notes_last_24h: u64,
    pub dod_articles: u64,
}

/// Category labels the defense-news feed uses, grouped by the `type`
/// filter `search_dod_news` exposes. `all` is the union.
pub const DOD_AUDIT_CATEGORIES: &[&str] = &["audit", "ig-report"];
pub const DOD_BUDGET_CATEGORIES: &[&str] = &["budget", "appropriations"];
pub const DOD_POLICY_CATEGORIES: &[&str] = &["policy", "acquisition"];

pub fn dod_categories() -> Vec<&'static str> {
    let mut all = Vec::new();
    all.extend_from_slice(DOD_AUDIT_CATEGORIES);
    all.extend_from_slice(DOD_BUDGET_CATEGORIES);
    all.extend_from_slice(DOD_POLICY_CATEGORIES);
    all
}
