//! Chat-completions payloads. A request is built straight from a
//! [`ModelRequest`]; a reply is read from its first choice only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Message, ModelRequest, ModelResponse, OutputItem, ProviderError, ProviderId, Role, StopReason,
    TokenUsage, ToolCall, ToolDefinition,
};

/// Body of `POST /chat/completions`. Never streamed; `tool_choice` is `"auto"`
/// whenever tools are offered and absent otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ChatTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// A blank `request.model` is replaced by `fallback_model`.
    pub fn from_model_request(
        request: ModelRequest,
        fallback_model: &str,
    ) -> Result<Self, ProviderError> {
        if request.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "chat completion request requires at least one message",
            ));
        }

        let model = if request.model.trim().is_empty() {
            fallback_model.to_string()
        } else {
            request.model
        };

        let tools = request
            .tools
            .into_iter()
            .map(ChatTool::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let tool_choice = (!tools.is_empty()).then_some("auto");

        Ok(Self {
            model,
            messages: request.messages.into_iter().map(ChatMessage::from).collect(),
            tools,
            tool_choice,
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
            stream: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl From<Message> for ChatMessage {
    fn from(message: Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: ChatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl TryFrom<ToolDefinition> for ChatTool {
    type Error = ProviderError;

    fn try_from(tool: ToolDefinition) -> Result<Self, Self::Error> {
        if !tool.parameters.is_object() {
            return Err(ProviderError::invalid_request(format!(
                "tool '{}' parameters must be a JSON object schema",
                tool.name
            )));
        }

        Ok(Self {
            kind: "function",
            function: ChatFunction {
                name: tool.name,
                description: tool.description,
                parameters: tool.parameters,
            },
        })
    }
}

/// A decoded chat-completions reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: AssistantMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    tool_calls: Option<Vec<NativeToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
struct NativeToolCall {
    id: String,
    function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl ChatCompletion {
    /// Text first, then the native tool calls, both from the first choice.
    /// A reply without choices is a transport failure.
    pub fn into_model_response(self, provider: ProviderId) -> Result<ModelResponse, ProviderError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::transport("chat completion did not include choices"))?;

        let mut output = Vec::new();
        if let Some(content) = choice.message.content.filter(|content| !content.is_empty()) {
            output.push(OutputItem::Message(Message::new(Role::Assistant, content)));
        }
        output.extend(
            choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(|call| {
                    OutputItem::ToolCall(ToolCall {
                        id: call.id,
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                }),
        );

        let usage = self.usage.map_or_else(TokenUsage::default, |usage| TokenUsage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        });

        Ok(ModelResponse {
            provider,
            model: self.model,
            output,
            stop_reason: stop_reason(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

pub(crate) fn stop_reason(finish_reason: Option<&str>) -> StopReason {
    match finish_reason {
        Some("stop") => StopReason::EndTurn,
        Some("length") => StopReason::MaxTokens,
        Some("tool_calls") | Some("function_call") => StopReason::ToolUse,
        _ => StopReason::Other,
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// The `error.message` of an OpenAI error body, if it is one.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}
