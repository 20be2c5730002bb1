//! Classifies a model response as plain text, a native tool call, or a tool
//! call embedded in free text as `<function=NAME>{...}</function>`.
//!
//! ```rust
//! use ragent::{InterpretedResponse, interpret_text};
//!
//! let parsed = interpret_text(r#"<function=add>{"a": 2, "b": 3}</function>"#);
//! match parsed {
//!     InterpretedResponse::EmbeddedCall(call) => {
//!         assert_eq!(call.name, "add");
//!         assert_eq!(call.arguments, r#"{"a":2,"b":3}"#);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use lazy_regex::{Lazy, lazy_regex};
use regex::Regex;
use rprovider::{ModelResponse, ToolCall};
use serde_json::Value;

pub const EMBEDDED_CALL_ID: &str = "embedded_call_1";

// The closing tag is optional and may be malformed (`<function>`, `</ function>`).
static RE_EMBEDDED_CALL: Lazy<Regex> = lazy_regex!(r"<function=([^>]+)>(.*?})(?:</?\s*function>)?");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretedResponse {
    PlainText(String),
    StructuredCall(ToolCall),
    EmbeddedCall(ToolCall),
}

impl InterpretedResponse {
    pub fn tool_call(&self) -> Option<&ToolCall> {
        match self {
            Self::PlainText(_) => None,
            Self::StructuredCall(call) | Self::EmbeddedCall(call) => Some(call),
        }
    }

    pub fn is_tool_call(&self) -> bool {
        self.tool_call().is_some()
    }
}

/// Native tool calls win; otherwise the assistant text is scanned for an
/// embedded call; otherwise the text is returned verbatim.
pub fn interpret(response: &ModelResponse) -> InterpretedResponse {
    let mut native = response.tool_calls();
    if let Some(call) = native.next() {
        let ignored = native.count();
        if ignored > 0 {
            tracing::debug!(
                tool_name = %call.name,
                ignored,
                "dispatching first native tool call; later calls ignored"
            );
        }
        return InterpretedResponse::StructuredCall(call.clone());
    }

    interpret_text(&response.text())
}

pub fn interpret_text(text: &str) -> InterpretedResponse {
    match extract_embedded_call(text) {
        Some(call) => InterpretedResponse::EmbeddedCall(call),
        None => InterpretedResponse::PlainText(text.to_string()),
    }
}

/// First `<function=NAME>{json}` match only. A payload that is not valid JSON
/// yields `None` so the caller falls back to plain text.
pub fn extract_embedded_call(text: &str) -> Option<ToolCall> {
    let mut matches = RE_EMBEDDED_CALL.captures_iter(text);
    let captures = matches.next()?;

    let ignored = matches.count();
    if ignored > 0 {
        tracing::debug!(ignored, "embedded tool calls after the first were ignored");
    }

    let name = captures.get(1)?.as_str().trim();
    let payload = captures.get(2)?.as_str().trim();

    let arguments = match serde_json::from_str::<Value>(payload) {
        Ok(arguments) => arguments,
        Err(err) => {
            tracing::debug!(tool_name = name, error = %err, "embedded tool call payload is not JSON");
            return None;
        }
    };

    Some(ToolCall::new(EMBEDDED_CALL_ID, name, arguments.to_string()))
}

#[cfg(test)]
mod tests {
    use rprovider::{Message, OutputItem, ProviderId, Role, StopReason, TokenUsage};

    use super::*;

    fn response(output: Vec<OutputItem>) -> ModelResponse {
        ModelResponse {
            provider: ProviderId::OpenAi,
            model: "gpt-4o-mini".to_string(),
            output,
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    fn text(content: &str) -> OutputItem {
        OutputItem::Message(Message::new(Role::Assistant, content))
    }

    fn embedded(parsed: InterpretedResponse) -> ToolCall {
        match parsed {
            InterpretedResponse::EmbeddedCall(call) => call,
            other => panic!("expected embedded call, got {other:?}"),
        }
    }

    #[test]
    fn extracts_embedded_call_with_closing_tag() {
        let call = embedded(interpret_text(r#"<function=add>{"a": 2, "b": 3}</function>"#));

        assert_eq!(call.id, EMBEDDED_CALL_ID);
        assert_eq!(call.name, "add");
        let args: Value = serde_json::from_str(&call.arguments).expect("arguments are JSON");
        assert_eq!(args, serde_json::json!({"a": 2, "b": 3}));
    }

    #[test]
    fn extracts_embedded_call_without_or_with_malformed_closing_tag() {
        for raw in [
            r#"<function=add>{"a": 2, "b": 3}"#,
            r#"<function=add>{"a": 2, "b": 3}<function>"#,
            r#"<function=add>{"a": 2, "b": 3}</ function>"#,
            r#"sure! <function=add> {"a": 2, "b": 3} trailing"#,
        ] {
            let call = embedded(interpret_text(raw));
            assert_eq!(call.name, "add", "input {raw}");
            assert_eq!(call.arguments, r#"{"a":2,"b":3}"#, "input {raw}");
        }
    }

    #[test]
    fn first_embedded_match_wins() {
        let call = embedded(interpret_text(
            r#"<function=add>{"a": 1, "b": 1}</function><function=multiply>{"a": 4, "b": 5}</function>"#,
        ));

        assert_eq!(call.name, "add");
        assert_eq!(call.arguments, r#"{"a":1,"b":1}"#);
    }

    #[test]
    fn malformed_embedded_json_falls_back_to_plain_text() {
        let raw = r#"<function=add>{"a": 2, "b": }</function>"#;
        assert_eq!(
            interpret_text(raw),
            InterpretedResponse::PlainText(raw.to_string())
        );
    }

    #[test]
    fn nested_objects_stop_at_first_brace_and_fall_back() {
        let raw = r#"<function=swap>{"from": {"token": "SOL"}, "amount": 1}</function>"#;
        assert!(matches!(
            interpret_text(raw),
            InterpretedResponse::PlainText(_)
        ));
    }

    #[test]
    fn plain_text_is_returned_verbatim() {
        let parsed = interpret(&response(vec![text("  gm, frens  ")]));
        assert_eq!(parsed, InterpretedResponse::PlainText("  gm, frens  ".to_string()));
        assert!(!parsed.is_tool_call());
    }

    #[test]
    fn native_call_is_preferred_over_embedded_text() {
        let parsed = interpret(&response(vec![
            text(r#"<function=multiply>{"a": 4, "b": 5}</function>"#),
            OutputItem::ToolCall(ToolCall::new("call_1", "add", r#"{"a":2,"b":3}"#)),
            OutputItem::ToolCall(ToolCall::new("call_2", "multiply", r#"{"a":1,"b":1}"#)),
        ]));

        match parsed {
            InterpretedResponse::StructuredCall(call) => {
                assert_eq!(call.id, "call_1");
                assert_eq!(call.name, "add");
            }
            other => panic!("expected structured call, got {other:?}"),
        }
    }

    #[test]
    fn embedded_call_is_found_in_response_text() {
        let parsed = interpret(&response(vec![text(
            r#"<function=get_crypto_price>{"ticker": "btc"}</function>"#,
        )]));

        assert_eq!(
            parsed.tool_call().map(|call| call.name.as_str()),
            Some("get_crypto_price")
        );
    }
}
