//! Turn requests, final replies, phases, and agent defaults.

use rcommon::GenerationOptions;
use serde_json::Value;

use crate::ToolInvocationResult;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    AwaitingModelOutput,
    Interpreting,
    PlainTextReply,
    ToolDispatch,
    ToolExecuting,
    ToolResultReady,
    Done,
}

impl TurnPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingModelOutput => "awaiting_model_output",
            Self::Interpreting => "interpreting",
            Self::PlainTextReply => "plain_text_reply",
            Self::ToolDispatch => "tool_dispatch",
            Self::ToolExecuting => "tool_executing",
            Self::ToolResultReady => "tool_result_ready",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub model: String,
    pub system_prompt: String,
    pub options: GenerationOptions,
}

impl AgentConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            options: GenerationOptions::default()
                .with_temperature(DEFAULT_TEMPERATURE)
                .with_max_tokens(DEFAULT_MAX_TOKENS),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// One conversational turn as handed over by a platform adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub include_tools: bool,
}

impl TurnRequest {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            user_prompt: user_prompt.into(),
            temperature: None,
            max_tokens: None,
            include_tools: true,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn without_tools(mut self) -> Self {
        self.include_tools = false;
        self
    }

    pub(crate) fn options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// What the platform adapter renders: text, an image, and/or a tool result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinalReply {
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub tool_result: Option<ToolInvocationResult>,
}

impl FinalReply {
    pub fn from_outcome(text: Option<String>, tool_result: Option<ToolInvocationResult>) -> Self {
        let image_url = tool_result
            .as_ref()
            .and_then(ToolInvocationResult::success_value)
            .and_then(|value| value.get("image_url"))
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Self {
            text,
            image_url,
            tool_result,
        }
    }
}
