//! The conversation loop.
//!
//! One exchange walks DRAFTING -> AWAITING_MODEL -> (TOOL_PHASE <->
//! AWAITING_MODEL)* -> DONE | EXHAUSTED | FAILED. A provider failure
//! anywhere in the exchange abandons the current model and restarts from
//! DRAFTING with the next candidate in the chain; when the chain runs dry
//! the caller gets a fixed apology instead of an error. The audit trail
//! and message history are threaded through the loop as explicit
//! accumulators so every transition is visible to tests.

use anyhow::{anyhow, Result};
use futures::future::join_all;

use fieldnote_provider::{ContentBlock, LlmMessage, LlmRequest};
use fieldnote_schema::{AgentId, AgentStep, ChatReply, ConversationTurn, Role};

use crate::fallback::ModelChain;
use crate::profiles::{AgentCatalog, AgentProfile};
use crate::tool::ToolRegistry;

/// Fixed reply when every model in the chain failed. The chat surface
/// never sees a raw error.
pub const FAILURE_REPLY: &str =
    "Sorry, I ran into a problem answering that. Please try again in a moment.";

/// Closing instruction sent when the iteration budget runs out while the
/// model still wants tools.
const FINAL_ANSWER_NUDGE: &str =
    "Provide your final answer now using what you already have. Do not request any more tools.";

/// At most this many history turns are replayed to the model.
const HISTORY_WINDOW: usize = 6;

const MAX_TOKENS: u32 = 2048;

pub struct Orchestrator {
    chain: ModelChain,
    catalog: AgentCatalog,
    tools: ToolRegistry,
}

impl Orchestrator {
    pub fn new(chain: ModelChain, catalog: AgentCatalog, tools: ToolRegistry) -> Self {
        Self {
            chain,
            catalog,
            tools,
        }
    }

    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    /// Runs one full exchange for `agent_id`. `history` is the
    /// caller-owned prior conversation (most-recent-last, without the
    /// in-flight message); `message` is the turn being answered.
    pub async fn run_exchange(
        &self,
        agent_id: AgentId,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<ChatReply> {
        let profile = self
            .catalog
            .get(agent_id)
            .ok_or_else(|| anyhow!("agent not found: {agent_id}"))?;

        let mut tried = Vec::new();
        for (idx, candidate) in self.chain.candidates().iter().enumerate() {
            tried.push(candidate.clone());
            match self.attempt(candidate, profile, history, message).await {
                Ok(reply) => {
                    if idx > 0 {
                        tracing::info!(
                            "fallback_triggered=true, agent={}, model={candidate}, attempt={}",
                            profile.id,
                            idx + 1
                        );
                    }
                    return Ok(reply);
                }
                Err(e) => {
                    tracing::warn!(
                        "model {candidate} failed for agent {}, advancing chain: {e:#}",
                        profile.id
                    );
                }
            }
        }

        tracing::error!(
            "all models failed for agent {} (tried: {})",
            profile.id,
            tried.join(" -> ")
        );
        Ok(reply_for(
            profile,
            FAILURE_REPLY.to_string(),
            vec![AgentStep::answer(FAILURE_REPLY)],
        ))
    }

    /// One full exchange against a single model candidate. Any provider
    /// error aborts the attempt; the caller restarts with the next
    /// candidate and a fresh audit trail.
    async fn attempt(
        &self,
        candidate: &str,
        profile: &AgentProfile,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<ChatReply> {
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut messages = draft_messages(history, message);
        let tool_defs = self.tools.definitions();

        for _round in 0..profile.max_iterations {
            let request = LlmRequest {
                model: String::new(),
                system: Some(profile.system_prompt.clone()),
                messages: messages.clone(),
                max_tokens: MAX_TOKENS,
                tools: tool_defs.clone(),
            };
            let resp = self.chain.chat_with(candidate, request).await?;

            let tool_uses: Vec<(String, String, serde_json::Value)> = resp
                .tool_uses()
                .into_iter()
                .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
                .collect();

            // No tool requests: the text is the final answer, even when a
            // structured call was expected but came back malformed.
            if tool_uses.is_empty() {
                steps.push(AgentStep::answer(resp.text.clone()));
                return Ok(reply_for(profile, resp.text, steps));
            }

            let thought = resp.text.trim();
            if !thought.is_empty() {
                steps.push(AgentStep::thought(thought));
            }
            messages.push(LlmMessage {
                role: "assistant".into(),
                content: resp.content,
            });

            for (_, name, input) in &tool_uses {
                steps.push(AgentStep::tool_call(name.clone(), input.clone()));
            }

            // Each call is self-contained, so the round's invocations run
            // concurrently against the store.
            let outcomes = join_all(tool_uses.iter().map(|(id, name, input)| async move {
                (
                    id.clone(),
                    name.clone(),
                    self.tools.run(name, input.clone()).await,
                )
            }))
            .await;

            let mut results = Vec::with_capacity(outcomes.len());
            for (id, name, outcome) in outcomes {
                let is_error = !outcome.success;
                let payload = serde_json::to_value(&outcome)?;
                steps.push(AgentStep::tool_result(name, payload.clone()));
                results.push(ContentBlock::ToolResult {
                    tool_use_id: id,
                    content: payload.to_string(),
                    is_error,
                });
            }
            messages.push(LlmMessage {
                role: "user".into(),
                content: results,
            });
        }

        // EXHAUSTED: the budget ran out while the model still wanted
        // tools. Ask once more, without a catalog, and take whatever text
        // comes back.
        tracing::warn!(
            "agent {} hit its iteration budget ({}), forcing a final answer",
            profile.id,
            profile.max_iterations
        );
        messages.push(LlmMessage::user(FINAL_ANSWER_NUDGE));
        let request = LlmRequest {
            model: String::new(),
            system: Some(profile.system_prompt.clone()),
            messages,
            max_tokens: MAX_TOKENS,
            tools: vec![],
        };
        let resp = self.chain.chat_with(candidate, request).await?;
        steps.push(AgentStep::answer(resp.text.clone()));
        Ok(reply_for(profile, resp.text, steps))
    }
}

/// DRAFTING: the last few history turns plus the in-flight message.
fn draft_messages(history: &[ConversationTurn], message: &str) -> Vec<LlmMessage> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut messages: Vec<LlmMessage> = history[start..]
        .iter()
        .map(|turn| match turn.role {
            Role::User => LlmMessage::user(turn.content.clone()),
            Role::Assistant => LlmMessage::assistant(turn.content.clone()),
        })
        .collect();
    messages.push(LlmMessage::user(message.to_string()));
    messages
}

fn reply_for(profile: &AgentProfile, answer: String, steps: Vec<AgentStep>) -> ChatReply {
    ChatReply {
        reply: answer,
        agent_id: profile.id,
        agent_name: profile.display_name.clone(),
        agent_emoji: profile.emoji.clone(),
        steps,
    }
}
