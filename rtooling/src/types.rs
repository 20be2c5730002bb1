//! Tool execution context, agent call-back contract, and execution results.

use std::fmt::Formatter;
use std::sync::Arc;

use rcommon::{BoxFuture, MetadataMap, SessionId, TraceId};
use rprovider::ToolCall;
use serde_json::Value;

use crate::ToolError;

/// Platform-specific behavior a tool may call back into, held by the adapter
/// that owns the turn.
pub trait AgentContext: Send + Sync {
    fn platform(&self) -> &str;

    /// Generates an image for `prompt` and returns a URL the platform can deliver.
    fn generate_image<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ToolError>>;
}

#[derive(Clone)]
pub struct ToolExecutionContext {
    pub session_id: SessionId,
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
    pub agent: Option<Arc<dyn AgentContext>>,
}

impl ToolExecutionContext {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            trace_id: None,
            metadata: MetadataMap::new(),
            agent: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_agent(mut self, agent: Arc<dyn AgentContext>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn agent(&self) -> Result<&dyn AgentContext, ToolError> {
        self.agent
            .as_deref()
            .ok_or_else(|| ToolError::execution("no agent context attached to this turn"))
    }
}

impl std::fmt::Debug for ToolExecutionContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutionContext")
            .field("session_id", &self.session_id)
            .field("trace_id", &self.trace_id)
            .field("metadata", &self.metadata)
            .field("agent", &self.agent.as_ref().map(|agent| agent.platform()))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub output: Value,
}

impl ToolExecutionResult {
    pub fn new(tool_call_id: impl Into<String>, tool_name: impl Into<String>, output: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            output,
        }
    }

    pub fn from_call(call: &ToolCall, output: Value) -> Self {
        Self::new(call.id.clone(), call.name.clone(), output)
    }
}
