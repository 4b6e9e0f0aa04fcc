//! The chat endpoint. Internal failures never surface as a 5xx here; the
//! chat UI always receives a 200 with either a real answer or the fixed
//! apology string.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use fieldnote_core::{route, FAILURE_REPLY};
use fieldnote_schema::{AgentId, AgentStep, ChatReply, ChatRequest, ConversationTurn, Role};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatReply> {
    let page = req.page.clone();
    let Some((history, message)) = split_request(req) else {
        tracing::warn!("chat request carried no usable message");
        return Json(apology(&state, AgentId::Portfolio));
    };

    let agent_id = route(&message, page.as_deref());

    if let Err(e) = state.store.record_chat_message("user", agent_id.as_str()).await {
        tracing::warn!("failed to record user chat message: {e:#}");
    }

    let reply = match state
        .orchestrator
        .run_exchange(agent_id, &history, &message)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("chat exchange failed internally: {e:#}");
            apology(&state, agent_id)
        }
    };

    if let Err(e) = state
        .store
        .record_chat_message("assistant", agent_id.as_str())
        .await
    {
        tracing::warn!("failed to record assistant chat message: {e:#}");
    }

    Json(reply)
}

/// Splits the request into prior history and the turn being answered.
/// Callers send either a bare `message` (history optional alongside) or a
/// full `messages` list whose last entry is the new user turn.
fn split_request(req: ChatRequest) -> Option<(Vec<ConversationTurn>, String)> {
    if let Some(message) = req.message {
        let message = message.trim().to_string();
        if !message.is_empty() {
            return Some((req.messages, message));
        }
    }

    let mut turns = req.messages;
    let last_is_user = matches!(
        turns.last(),
        Some(turn) if turn.role == Role::User && !turn.content.trim().is_empty()
    );
    if last_is_user {
        let message = turns.pop()?.content.trim().to_string();
        return Some((turns, message));
    }
    None
}

fn apology(state: &AppState, agent_id: AgentId) -> ChatReply {
    let (agent_name, agent_emoji) = state
        .orchestrator
        .catalog()
        .get(agent_id)
        .map(|p| (p.display_name.clone(), p.emoji.clone()))
        .unwrap_or_else(|| ("Assistant".to_string(), "💬".to_string()));
    ChatReply {
        reply: FAILURE_REPLY.to_string(),
        agent_id,
        agent_name,
        agent_emoji,
        steps: vec![AgentStep::answer(FAILURE_REPLY)],
    }
}
