//! Priority-ordered model fallback chain.
//!
//! Candidates are `provider/model` strings tried top to bottom. A
//! candidate is abandoned only on hard failure (transport or provider
//! error), never on an undesired answer, and fallback is immediate: the
//! chain is short and the goal is availability, so no backoff, retry, or
//! cooldown sits between attempts.

use anyhow::{anyhow, Result};
use fieldnote_provider::{LlmRequest, LlmResponse, ProviderRegistry};

pub struct ModelChain {
    registry: ProviderRegistry,
    candidates: Vec<String>,
}

impl ModelChain {
    /// Builds the chain, deduplicating candidates while preserving order.
    pub fn new(registry: ProviderRegistry, candidates: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let candidates = candidates
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .collect();
        Self {
            registry,
            candidates,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// One model call against a specific candidate. The request's `model`
    /// field is overwritten with the candidate's model id.
    pub async fn chat_with(&self, candidate: &str, mut request: LlmRequest) -> Result<LlmResponse> {
        let (provider_id, model_id) = parse_provider_model(candidate)?;
        let provider = self.registry.get(provider_id)?;
        request.model = model_id.to_string();
        provider.chat(request).await
    }
}

pub fn parse_provider_model(input: &str) -> Result<(&str, &str)> {
    match input.split_once('/') {
        Some((provider, model)) if !provider.is_empty() && !model.is_empty() => {
            Ok((provider, model))
        }
        _ => Err(anyhow!("invalid model format (want provider/model): {input}")),
    }
}
