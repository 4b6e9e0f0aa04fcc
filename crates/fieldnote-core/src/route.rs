//! Maps `(message, page)` to one agent id with a cheap local heuristic;
//! no model call is spent deciding who should answer. Pure function: same
//! inputs, same route.

use fieldnote_schema::AgentId;

/// Pages hard-bound to a topical agent. Page context overrides keyword
/// inference entirely.
const PAGE_BINDINGS: &[(&str, AgentId)] = &[
    ("dod-financial-management", AgentId::DodPolicy),
    ("federal-finance", AgentId::DodPolicy),
    ("ai-ml", AgentId::TechNews),
];

/// Keyword sets in fixed priority order: policy beats news beats notes.
const POLICY_KEYWORDS: &[&str] = &[
    "dod",
    "defense",
    "pentagon",
    "fiar",
    "audit",
    "budget",
    "appropriation",
    "comptroller",
    "financial management",
    "military",
];

const TECH_KEYWORDS: &[&str] = &[
    "tech",
    "artificial intelligence",
    "machine learning",
    "llm",
    "software",
    "startup",
    "programming",
    "framework",
    "open source",
];

const NOTE_KEYWORDS: &[&str] = &[
    "note",
    "journal",
    "diary",
    "remember",
    "jot",
    "mood",
    "wrote down",
];

pub fn route(message: &str, page: Option<&str>) -> AgentId {
    if let Some(page) = page {
        let page = page.to_lowercase();
        for (fragment, agent) in PAGE_BINDINGS {
            if page.contains(fragment) {
                return *agent;
            }
        }
    }

    let message = message.to_lowercase();
    let sets = [
        (POLICY_KEYWORDS, AgentId::DodPolicy),
        (TECH_KEYWORDS, AgentId::TechNews),
        (NOTE_KEYWORDS, AgentId::Journal),
    ];
    for (keywords, agent) in sets {
        if keywords.iter().any(|kw| message.contains(kw)) {
            return agent;
        }
    }

    AgentId::Portfolio
}
