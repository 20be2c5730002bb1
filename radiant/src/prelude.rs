//! Common imports for applications built on radiant.

pub use crate::tool_params;
pub use crate::{
    AgentContext, AgentError, AgentRuntime, ConsolePlatform, CoreAgent, FinalReply,
    ModelProvider, Notification, ParamSpec, ParamType, RadiantError, Settings, SessionId, Tool,
    ToolError, ToolExecutionContext, ToolInvocationResult, ToolRegistry, ToolSpec, TurnRequest,
    build_runtime, builtin_registry, render_reply,
};
