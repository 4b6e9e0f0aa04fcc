//! Google Gemini API provider
//!
//! https://ai.google.dev/api/generate-content

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{ContentBlock, LlmProvider, LlmRequest, LlmResponse, ProviderErrorKind};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE)
    }

    pub fn with_base_url(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_request(&self, request: &LlmRequest) -> GeminiRequest {
        let mut contents = Vec::new();

        for msg in &request.messages {
            let role = match msg.role.as_str() {
                "assistant" => "model",
                _ => "user",
            };

            let mut parts = Vec::new();
            for block in &msg.content {
                match block {
                    ContentBlock::Text { text } => {
                        parts.push(GeminiPart::Text { text: text.clone() });
                    }
                    ContentBlock::ToolUse { name, input, .. } => {
                        parts.push(GeminiPart::FunctionCall {
                            function_call: GeminiFunctionCall {
                                name: name.clone(),
                                args: input.clone(),
                            },
                        });
                    }
                    ContentBlock::ToolResult {
                        tool_use_id,
                        content,
                        ..
                    } => {
                        // Gemini matches responses by function name, not id;
                        // our call ids are "<name>__<index>".
                        parts.push(GeminiPart::FunctionResponse {
                            function_response: GeminiFunctionResponse {
                                name: call_name(tool_use_id).to_string(),
                                response: serde_json::json!({ "result": content }),
                            },
                        });
                    }
                }
            }

            if !parts.is_empty() {
                contents.push(GeminiContent {
                    role: role.to_string(),
                    parts,
                });
            }
        }

        let tools = if request.tools.is_empty() {
            None
        } else {
            let function_declarations: Vec<GeminiFunctionDeclaration> = request
                .tools
                .iter()
                .map(|tool| GeminiFunctionDeclaration {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    parameters: tool.input_schema.clone(),
                })
                .collect();
            Some(vec![GeminiTool {
                function_declarations,
            }])
        };

        GeminiRequest {
            contents,
            system_instruction: request.system.as_ref().map(|s| GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart::Text { text: s.clone() }],
            }),
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: Some(request.max_tokens),
            }),
            tools,
        }
    }
}

/// Call id for the nth function call of a response.
pub fn call_id(name: &str, index: usize) -> String {
    format!("{name}__{index}")
}

fn call_name(call_id: &str) -> &str {
    call_id.split("__").next().unwrap_or(call_id)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, request.model, self.api_key
        );
        let payload = self.build_request(&request);

        let resp = match self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return Err(anyhow!("gemini api error (timeout): request timed out"));
            }
            Err(e) if e.is_connect() => {
                return Err(anyhow!("gemini api error (connect): {e}"));
            }
            Err(e) => return Err(e.into()),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            return Err(format_api_error(status, &text));
        }

        let body: GeminiResponse = resp.json().await?;
        to_llm_response(body)
    }
}

fn to_llm_response(body: GeminiResponse) -> Result<LlmResponse> {
    let candidate = body
        .candidates
        .first()
        .ok_or_else(|| anyhow!("gemini api error: empty candidates"))?;

    let mut content = Vec::new();
    let mut text = String::new();
    let mut calls = 0usize;

    for part in &candidate.content.parts {
        match part {
            GeminiPart::Text { text: t } => {
                if !t.is_empty() {
                    text.push_str(t);
                    content.push(ContentBlock::Text { text: t.clone() });
                }
            }
            GeminiPart::FunctionCall { function_call } => {
                content.push(ContentBlock::ToolUse {
                    id: call_id(&function_call.name, calls),
                    name: function_call.name.clone(),
                    input: function_call.args.clone(),
                });
                calls += 1;
            }
            GeminiPart::FunctionResponse { .. } => {}
        }
    }

    let stop_reason = match candidate.finish_reason.as_deref() {
        Some("STOP") => Some("end_turn".to_string()),
        Some("MAX_TOKENS") => Some("max_tokens".to_string()),
        Some("SAFETY") => Some("safety".to_string()),
        Some(r) => Some(r.to_lowercase()),
        None => None,
    };

    Ok(LlmResponse {
        text,
        content,
        input_tokens: body.usage_metadata.as_ref().map(|u| u.prompt_token_count),
        output_tokens: body
            .usage_metadata
            .as_ref()
            .map(|u| u.candidates_token_count),
        stop_reason,
    })
}

fn format_api_error(status: StatusCode, text: &str) -> anyhow::Error {
    let kind = ProviderErrorKind::from_status(status);
    anyhow!("gemini api error ({status}, {}): {text}", kind.as_str())
}

// ============================================================
// Gemini API Types
// ============================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: GeminiFunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: GeminiFunctionResponse,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: GeminiContent,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}
