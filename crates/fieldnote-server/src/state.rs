use std::sync::Arc;

use fieldnote_core::Orchestrator;
use fieldnote_store::JournalStore;

/// Shared application state accessible from all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub store: JournalStore,
}
