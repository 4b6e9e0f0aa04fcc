use fieldnote_provider::{GeminiProvider, LlmMessage, LlmProvider, LlmRequest, ToolDef};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_text_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{"text": text}] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5 }
    })
}

fn request_with_tools() -> LlmRequest {
    LlmRequest {
        model: "gemini-2.0-flash".into(),
        system: Some("you are a journal assistant".into()),
        messages: vec![LlmMessage::user("what are my recent notes?")],
        max_tokens: 256,
        tools: vec![ToolDef {
            name: "get_recent_notes".into(),
            description: "List recent notes".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": { "limit": { "type": "number" } }
            }),
        }],
    }
}

#[tokio::test]
async fn gemini_basic_chat_hits_generate_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_text_response("Hi there!")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_base_url("test-key", server.uri());
    let resp = provider
        .chat(LlmRequest::simple(
            "gemini-2.0-flash".into(),
            Some("be brief".into()),
            "hello".into(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.text, "Hi there!");
    assert_eq!(resp.input_tokens, Some(10));
    assert_eq!(resp.output_tokens, Some(5));
    assert_eq!(resp.stop_reason.as_deref(), Some("end_turn"));
}

#[tokio::test]
async fn gemini_sends_function_declarations_and_parses_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_partial_json(serde_json::json!({
            "tools": [{
                "functionDeclarations": [{"name": "get_recent_notes"}]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {"name": "get_recent_notes", "args": {"limit": 3}}}]
                },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_base_url("test-key", server.uri());
    let resp = provider.chat(request_with_tools()).await.unwrap();

    let uses = resp.tool_uses();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].1, "get_recent_notes");
    assert_eq!(uses[0].2["limit"], 3);
}

#[tokio::test]
async fn gemini_http_error_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429).set_body_string("{\"error\": \"quota exhausted\"}"),
        )
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_base_url("test-key", server.uri());
    let err = provider
        .chat(LlmRequest::simple(
            "gemini-2.0-flash".into(),
            None,
            "hello".into(),
        ))
        .await
        .err()
        .unwrap();

    let text = err.to_string();
    assert!(text.contains("429"));
    assert!(text.contains("rate_limit"));
}
