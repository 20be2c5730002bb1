//! Response interpretation, tool dispatch, and per-turn orchestration over a
//! model provider and a tool registry.

mod agent;
mod dispatch;
mod error;
mod hooks;
mod interpret;
mod types;

pub mod prelude {
    pub use crate::{
        AgentConfig, AgentError, AgentErrorKind, CoreAgent, CoreAgentBuilder, DispatchOutcome,
        Dispatcher, FinalReply, InterpretedResponse, ToolFailure, ToolInvocationResult,
        TurnHooks, TurnPhase, TurnRequest,
    };
    pub use rcommon::{MetadataMap, SessionId, TraceId};
    pub use rtooling::{
        AgentContext, ParamType, Tool, ToolError, ToolErrorKind, ToolExecutionContext,
        ToolRegistry, ToolSpec,
    };
}

pub use agent::{CoreAgent, CoreAgentBuilder};
pub use dispatch::{DispatchOutcome, Dispatcher, ToolFailure, ToolInvocationResult};
pub use error::{AgentError, AgentErrorKind};
pub use hooks::{NoopTurnHooks, TurnHooks};
pub use interpret::{
    EMBEDDED_CALL_ID, InterpretedResponse, extract_embedded_call, interpret, interpret_text,
};
pub use types::{
    AgentConfig, DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, FinalReply,
    TurnPhase, TurnRequest,
};
