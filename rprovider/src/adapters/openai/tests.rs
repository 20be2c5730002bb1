//! Focused unit tests for OpenAI adapter internals.

#![cfg(test)]

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use crate::{
    Message, ModelRequest, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, Role,
    SecretString, StopReason, ToolDefinition,
};

use super::provider::OpenAiProvider;
use super::transport::{OpenAiTransport, error_for_status};
use super::wire::{ChatCompletion, ChatCompletionRequest, error_message, stop_reason};

#[derive(Debug)]
struct NoopTransport;

impl OpenAiTransport for NoopTransport {
    fn complete<'a>(
        &'a self,
        _request: ChatCompletionRequest,
        _api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ChatCompletion, ProviderError>> {
        Box::pin(async { Err(ProviderError::other("not used")) })
    }
}

fn add_tool() -> ToolDefinition {
    ToolDefinition {
        name: "add".to_string(),
        description: "Add two numbers".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
            "required": ["a", "b"]
        }),
    }
}

#[test]
fn blank_model_falls_back_and_roles_keep_their_wire_names() {
    let provider = OpenAiProvider::new(SecretString::new("sk"), Arc::new(NoopTransport))
        .with_fallback_model("gpt-4o");
    let request = ModelRequest::new(
        " ",
        vec![
            Message::new(Role::System, "be terse"),
            Message::new(Role::User, "hi"),
        ],
    );

    let built = provider.chat_request(request).expect("request should build");
    assert_eq!(built.model, "gpt-4o");
    assert_eq!(built.messages[0].role, "system");
    assert_eq!(built.messages[1].role, "user");
    assert!(!built.stream);
}

#[test]
fn tool_choice_is_auto_only_when_tools_are_offered() {
    let plain = ChatCompletionRequest::from_model_request(
        ModelRequest::from_prompts("gpt-4o-mini", "sys", "hi")
            .with_temperature(0.7)
            .with_max_tokens(500),
        "unused",
    )
    .expect("request should build");
    let encoded = serde_json::to_value(&plain).expect("request should serialize");
    assert!(encoded.get("tools").is_none());
    assert!(encoded.get("tool_choice").is_none());
    assert_eq!(encoded["max_tokens"], 500);
    assert_eq!(encoded["stream"], false);

    let with_tools = ChatCompletionRequest::from_model_request(
        ModelRequest::from_prompts("gpt-4o-mini", "sys", "what's 2+3").with_tools(vec![add_tool()]),
        "unused",
    )
    .expect("request should build");
    let encoded = serde_json::to_value(&with_tools).expect("request should serialize");
    assert_eq!(encoded["tool_choice"], "auto");
    assert_eq!(encoded["tools"][0]["type"], "function");
    assert_eq!(encoded["tools"][0]["function"]["name"], "add");
    assert_eq!(
        encoded["tools"][0]["function"]["parameters"]["required"],
        json!(["a", "b"])
    );
    assert!(encoded.get("temperature").is_none());
}

#[test]
fn non_object_tool_schema_is_an_invalid_request() {
    let mut tool = add_tool();
    tool.parameters = json!("not a schema");

    let error = ChatCompletionRequest::from_model_request(
        ModelRequest::from_prompts("gpt-4o-mini", "sys", "hi").with_tools(vec![tool]),
        "unused",
    )
    .expect_err("non-object schema should fail");
    assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    assert!(error.message.contains("'add'"));
}

#[test]
fn finish_reason_maps_to_stop_reason() {
    assert_eq!(stop_reason(Some("stop")), StopReason::EndTurn);
    assert_eq!(stop_reason(Some("length")), StopReason::MaxTokens);
    assert_eq!(stop_reason(Some("tool_calls")), StopReason::ToolUse);
    assert_eq!(stop_reason(Some("content_filter")), StopReason::Other);
    assert_eq!(stop_reason(None), StopReason::Other);
}

#[test]
fn native_tool_calls_are_read_from_the_first_choice_only() {
    let completion: ChatCompletion = serde_json::from_value(json!({
        "model": "gpt-4o-mini",
        "choices": [
            {
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "add", "arguments": "{\"a\":2,\"b\":3}"}
                    }]
                },
                "finish_reason": "tool_calls"
            },
            {
                "message": {"role": "assistant", "content": "second choice"},
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
    }))
    .expect("payload should parse");

    let response = completion
        .into_model_response(ProviderId::OpenAi)
        .expect("response should convert");

    assert!(response.text().is_empty());
    assert_eq!(response.stop_reason, StopReason::ToolUse);
    assert_eq!(response.usage.input_tokens, 12);
    assert_eq!(response.usage.total_tokens, 16);

    let calls = response.tool_calls().collect::<Vec<_>>();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_9");
    assert_eq!(calls[0].arguments, "{\"a\":2,\"b\":3}");
}

#[test]
fn text_reply_without_usage_defaults_to_zero_tokens() {
    let completion: ChatCompletion = serde_json::from_value(json!({
        "model": "gpt-4o-mini",
        "choices": [{
            "message": {"role": "assistant", "content": "2 + 3 = 5"},
            "finish_reason": "stop"
        }]
    }))
    .expect("payload should parse");

    let response = completion
        .into_model_response(ProviderId::OpenAiCompatible)
        .expect("response should convert");
    assert_eq!(response.text(), "2 + 3 = 5");
    assert_eq!(response.provider, ProviderId::OpenAiCompatible);
    assert_eq!(response.usage.total_tokens, 0);
    assert_eq!(response.tool_calls().count(), 0);
}

#[test]
fn reply_without_choices_is_transport_error() {
    let completion: ChatCompletion =
        serde_json::from_value(json!({"model": "gpt-4o-mini", "choices": []}))
            .expect("payload should parse");

    let error = completion
        .into_model_response(ProviderId::OpenAi)
        .expect_err("missing choice should fail");
    assert_eq!(error.kind, ProviderErrorKind::Transport);
    assert!(error.retryable);
}

#[test]
fn http_status_maps_to_error_kind_and_retryability() {
    let cases = [
        (StatusCode::UNAUTHORIZED, ProviderErrorKind::Authentication, false),
        (StatusCode::TOO_MANY_REQUESTS, ProviderErrorKind::RateLimited, true),
        (StatusCode::BAD_REQUEST, ProviderErrorKind::InvalidRequest, false),
        (StatusCode::GATEWAY_TIMEOUT, ProviderErrorKind::Timeout, true),
        (StatusCode::SERVICE_UNAVAILABLE, ProviderErrorKind::Unavailable, true),
        (StatusCode::INTERNAL_SERVER_ERROR, ProviderErrorKind::Transport, true),
    ];

    for (status, kind, retryable) in cases {
        let error = error_for_status(status, "boom".to_string());
        assert_eq!(error.kind, kind, "status {status}");
        assert_eq!(error.retryable, retryable, "status {status}");
    }
}

#[test]
fn error_message_reads_openai_envelope() {
    let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
    assert_eq!(
        error_message(body).as_deref(),
        Some("Incorrect API key provided")
    );
    assert_eq!(error_message("<html>bad gateway</html>"), None);
}
