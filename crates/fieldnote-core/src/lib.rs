pub mod fallback;
pub mod journal_tools;
pub mod news_tools;
pub mod orchestrator;
pub mod profiles;
pub mod route;
pub mod stats_tool;
pub mod tool;

pub use fallback::*;
pub use journal_tools::*;
pub use news_tools::*;
pub use orchestrator::*;
pub use profiles::*;
pub use route::*;
pub use stats_tool::*;
pub use tool::*;

use anyhow::Result;
use fieldnote_store::JournalStore;

/// The complete tool catalog the chat agents are prompted against. Every
/// name in it has exactly one handler; duplicates fail at startup.
pub fn builtin_tool_registry(store: JournalStore) -> Result<tool::ToolRegistry> {
    tool::ToolRegistry::with_tools(vec![
        Box::new(news_tools::SearchTechArticlesTool::new(store.clone())),
        Box::new(news_tools::SearchDodNewsTool::new(store.clone())),
        Box::new(journal_tools::SaveNoteTool::new(store.clone())),
        Box::new(journal_tools::RecentNotesTool::new(store.clone())),
        Box::new(stats_tool::PlatformStatsTool::new(store)),
    ])
}
