//! Backend-agnostic request, response, and message model types.
//!
//! ```rust
//! use rprovider::{ModelRequest, ProviderErrorKind};
//!
//! let ok = ModelRequest::from_prompts("gpt-4o-mini", "You are terse.", "what's 2+3");
//! assert!(ok.validate().is_ok());
//!
//! let err = ModelRequest::from_prompts("", "sys", "hi").validate().unwrap_err();
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use std::fmt::{Display, Formatter};

use rcommon::GenerationOptions;
use serde_json::Value;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenAi,
    OpenAiCompatible,
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::OpenAi => "openai",
            Self::OpenAiCompatible => "openai-compatible",
        };

        f.write_str(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Serializable projection of a tool sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A tool invocation requested by the model; `arguments` is a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    Message(Message),
    ToolCall(ToolCall),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ToolUse,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub provider: ProviderId,
    pub model: String,
    pub output: Vec<OutputItem>,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

impl ModelResponse {
    /// Concatenated assistant text, in output order.
    pub fn text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message(message) if message.role == Role::Assistant => {
                    Some(message.content.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.output.iter().filter_map(|item| match item {
            OutputItem::ToolCall(call) => Some(call),
            OutputItem::Message(_) => None,
        })
    }
}

/// One chat-completion request: the prompt messages, generation options, and
/// the tool schemas offered for this turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
    pub tools: Vec<ToolDefinition>,
}

impl ModelRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: GenerationOptions::default(),
            tools: Vec::new(),
        }
    }

    /// System + user prompt pair, the shape every conversational turn uses.
    pub fn from_prompts(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self::new(
            model,
            vec![
                Message::new(Role::System, system_prompt),
                Message::new(Role::User, user_prompt),
            ],
        )
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one message is required",
            ));
        }

        if self.options.max_tokens == Some(0) {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if let Some(temperature) = self.options.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn validate_rejects_out_of_range_generation_options() {
        let zero_tokens = ModelRequest::from_prompts("gpt-4o-mini", "sys", "hi")
            .with_max_tokens(0)
            .validate()
            .expect_err("zero max_tokens should fail");
        assert_eq!(zero_tokens.kind, ProviderErrorKind::InvalidRequest);

        let hot = ModelRequest::from_prompts("gpt-4o-mini", "sys", "hi")
            .with_temperature(2.5)
            .validate()
            .expect_err("temperature above 2.0 should fail");
        assert!(hot.message.contains("temperature"));

        assert!(
            ModelRequest::from_prompts("gpt-4o-mini", "sys", "hi")
                .with_temperature(2.0)
                .with_max_tokens(1)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn validate_requires_a_model_and_a_message() {
        let no_messages = ModelRequest::new("gpt-4o-mini", Vec::new())
            .validate()
            .expect_err("empty request should fail");
        assert_eq!(no_messages.kind, ProviderErrorKind::InvalidRequest);

        let no_model = ModelRequest::from_prompts("  ", "sys", "hi")
            .validate()
            .expect_err("blank model should fail");
        assert!(no_model.message.contains("model"));
    }

    #[test]
    fn from_prompts_orders_system_before_user() {
        let request = ModelRequest::from_prompts("m", "be brief", "hello");
        assert_eq!(request.messages[0], Message::new(Role::System, "be brief"));
        assert_eq!(request.messages[1], Message::new(Role::User, "hello"));
    }

    #[test]
    fn response_text_and_tool_calls_are_projected_in_order() {
        let response = ModelResponse {
            provider: ProviderId::OpenAi,
            model: "m".to_string(),
            output: vec![
                OutputItem::Message(Message::new(Role::Assistant, "one ")),
                OutputItem::ToolCall(ToolCall::new("c1", "add", "{}")),
                OutputItem::Message(Message::new(Role::Assistant, "two")),
            ],
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        };

        assert_eq!(response.text(), "one two");
        assert_eq!(response.tool_calls().count(), 1);
    }
}
