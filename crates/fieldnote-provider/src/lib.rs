pub mod gemini;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

pub use gemini::GeminiProvider;
pub use types::*;

/// Narrow seam between the conversation loop and any hosted model API:
/// one request with system instructions, history, and a tool catalog in;
/// text and/or tool-call requests out.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse>;
}

/// Coarse classification of provider failures, used when formatting error
/// messages. Every variant is a hard failure from the caller's point of
/// view; the fallback chain advances on all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    RateLimit,
    ServerError,
    Timeout,
    AuthError,
    InvalidRequest,
    Unknown,
}

impl ProviderErrorKind {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            429 => Self::RateLimit,
            401 | 403 => Self::AuthError,
            400 | 422 => Self::InvalidRequest,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::ServerError => "server_error",
            Self::Timeout => "timeout",
            Self::AuthError => "auth_error",
            Self::InvalidRequest => "invalid_request",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, provider: Arc<dyn LlmProvider>) {
        self.providers.insert(id.into(), provider);
    }

    pub fn get(&self, id: &str) -> Result<Arc<dyn LlmProvider>> {
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("provider not found: {id}"))
    }

    pub fn list(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}

/// Offline stand-in used when no API key is configured and in tests.
/// Echoes the last user message so wiring stays exercisable end to end.
pub struct StubProvider;

#[async_trait]
impl LlmProvider for StubProvider {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse> {
        let user_text = request
            .messages
            .last()
            .map(|m| m.text())
            .unwrap_or_default();
        let text = format!("[stub:{}] {user_text}", request.model);
        Ok(LlmResponse {
            text: text.clone(),
            content: vec![ContentBlock::Text { text }],
            input_tokens: None,
            output_tokens: None,
            stop_reason: Some("end_turn".into()),
        })
    }
}
