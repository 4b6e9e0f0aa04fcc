//! Static agent-profile table: one role-specific instruction prompt, a
//! display identity, and a tool-call iteration budget per agent. Built
//! once at process start and passed by reference into the orchestrator.

use std::collections::HashMap;

use fieldnote_schema::AgentId;

#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub id: AgentId,
    pub display_name: String,
    pub emoji: String,
    pub system_prompt: String,
    /// Maximum tool round-trips before the model is forced to conclude.
    pub max_iterations: usize,
}

#[derive(Debug, Clone)]
pub struct AgentCatalog {
    profiles: HashMap<AgentId, AgentProfile>,
}

impl AgentCatalog {
    pub fn builtin() -> Self {
        let profiles = [
            AgentProfile {
                id: AgentId::DodPolicy,
                display_name: "Defense Finance Analyst".to_string(),
                emoji: "🏛️".to_string(),
                system_prompt: DOD_POLICY_PROMPT.to_string(),
                // Policy questions routinely need an extra lookup round.
                max_iterations: 4,
            },
            AgentProfile {
                id: AgentId::TechNews,
                display_name: "Tech News Curator".to_string(),
                emoji: "📰".to_string(),
                system_prompt: TECH_NEWS_PROMPT.to_string(),
                max_iterations: 3,
            },
            AgentProfile {
                id: AgentId::Journal,
                display_name: "Journal Assistant".to_string(),
                emoji: "📓".to_string(),
                system_prompt: JOURNAL_PROMPT.to_string(),
                max_iterations: 3,
            },
            AgentProfile {
                id: AgentId::Portfolio,
                display_name: "Portfolio Guide".to_string(),
                emoji: "🗂️".to_string(),
                system_prompt: PORTFOLIO_PROMPT.to_string(),
                max_iterations: 3,
            },
        ];
        Self {
            profiles: profiles.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentProfile> {
        self.profiles.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

const DOD_POLICY_PROMPT: &str = "\
You are a defense financial-management analyst embedded in a personal \
portfolio site. You answer questions about DoD audits (including FIAR), \
budgets, appropriations, and acquisition policy. Ground every claim in \
the site's news archive: use search_dod_news with the narrowest type \
filter that fits the question before answering. Cite article titles and \
sources. If the archive has nothing relevant, say so plainly instead of \
speculating.";

const TECH_NEWS_PROMPT: &str = "\
You are the tech-news curator for a personal portfolio site. You answer \
questions about software, AI/ML, and industry news using the site's \
aggregated feed. Use search_tech_articles to find relevant coverage and \
summarize what the archive actually says, newest first. Mention source \
names so the reader can follow up.";

const JOURNAL_PROMPT: &str = "\
You are the private journal assistant for the site owner. You help them \
capture and recall daily notes. When asked to record something, call \
save_note with the exact content (plus tags or mood when given). When \
asked what was written recently, call get_recent_notes and work from the \
returned summaries. Never invent notes that the tools did not return.";

const PORTFOLIO_PROMPT: &str = "\
You are the general assistant for a personal portfolio site. You answer \
questions about the site owner's work, projects, and the platform itself. \
Use get_platform_stats when asked about activity on the site. Keep \
answers short, friendly, and concrete.";
