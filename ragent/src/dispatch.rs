//! Routes an interpreted response to the tool runtime and folds every tool
//! failure into a tagged `ToolInvocationResult`.

use std::sync::Arc;

use rtooling::{ToolError, ToolErrorKind, ToolExecutionContext, ToolRuntime};
use serde_json::{Value, json};

use crate::{InterpretedResponse, NoopTurnHooks, TurnHooks, TurnPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFailure {
    UnknownTool,
    MalformedArguments,
    ToolExecutionFailed,
    ToolTimedOut,
}

impl ToolFailure {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown tool",
            Self::MalformedArguments => "invalid tool arguments",
            Self::ToolExecutionFailed => "tool execution failed",
            Self::ToolTimedOut => "tool timed out",
        }
    }
}

impl From<ToolErrorKind> for ToolFailure {
    fn from(value: ToolErrorKind) -> Self {
        match value {
            ToolErrorKind::NotFound => Self::UnknownTool,
            ToolErrorKind::InvalidArguments => Self::MalformedArguments,
            ToolErrorKind::Timeout => Self::ToolTimedOut,
            ToolErrorKind::Execution
            | ToolErrorKind::Transient
            | ToolErrorKind::Registration
            | ToolErrorKind::Other => Self::ToolExecutionFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocationResult {
    Success(Value),
    Error { kind: ToolFailure, message: String },
}

impl ToolInvocationResult {
    pub fn failure(kind: ToolFailure) -> Self {
        Self::Error {
            kind,
            message: kind.user_message().to_string(),
        }
    }

    pub fn success_value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// `{"success": value}` or `{"error": message}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(value) => json!({ "success": value }),
            Self::Error { message, .. } => json!({ "error": message }),
        }
    }
}

impl From<&ToolError> for ToolInvocationResult {
    fn from(value: &ToolError) -> Self {
        Self::failure(ToolFailure::from(value.kind))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchOutcome {
    pub text: Option<String>,
    pub tool_result: Option<ToolInvocationResult>,
}

#[derive(Clone)]
pub struct Dispatcher {
    runtime: Arc<dyn ToolRuntime>,
    hooks: Arc<dyn TurnHooks>,
}

impl Dispatcher {
    pub fn new(runtime: Arc<dyn ToolRuntime>) -> Self {
        Self {
            runtime,
            hooks: Arc::new(NoopTurnHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn TurnHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Never fails: unknown tools, bad arguments, tool errors, and tool panics
    /// all come back as `ToolInvocationResult::Error`.
    pub async fn dispatch(
        &self,
        response: InterpretedResponse,
        context: ToolExecutionContext,
    ) -> DispatchOutcome {
        let turn_id = context
            .trace_id
            .as_ref()
            .map(|trace_id| trace_id.to_string())
            .unwrap_or_default();

        let call = match response {
            InterpretedResponse::PlainText(text) => {
                self.hooks
                    .on_phase(TurnPhase::PlainTextReply, &context.session_id, &turn_id);
                return DispatchOutcome {
                    text: Some(text),
                    tool_result: None,
                };
            }
            InterpretedResponse::StructuredCall(call) | InterpretedResponse::EmbeddedCall(call) => {
                call
            }
        };

        self.hooks
            .on_phase(TurnPhase::ToolDispatch, &context.session_id, &turn_id);
        self.hooks
            .on_phase(TurnPhase::ToolExecuting, &context.session_id, &turn_id);

        let session_id = context.session_id.clone();
        let tool_name = call.name.clone();
        let result = match self.runtime.execute(call, context).await {
            Ok(result) => ToolInvocationResult::Success(result.output),
            Err(error) => {
                tracing::warn!(
                    session_id = %session_id,
                    tool_name = %tool_name,
                    error_kind = ?error.kind,
                    error = %error,
                    "tool invocation failed"
                );
                ToolInvocationResult::from(&error)
            }
        };

        self.hooks
            .on_phase(TurnPhase::ToolResultReady, &session_id, &turn_id);

        DispatchOutcome {
            text: None,
            tool_result: Some(result),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
