//! Facade over the radiant crates plus the pieces an application needs on
//! top of them: layered settings, the built-in tool box, background purchase
//! monitors, and the console platform adapter.
//!
//! ```rust
//! use radiant::{ParamType, ToolRegistry, ToolSpec, tool_params};
//! use serde_json::json;
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_sync_fn(
//!         ToolSpec::new("echo", "Echo the input back.")
//!             .with_params(tool_params![text: String => "Text to echo"]),
//!         |args, _ctx| Ok(args.get("text").cloned().unwrap_or_default()),
//!     )
//!     .unwrap();
//!
//! let schema = &registry.schemas()[0];
//! assert_eq!(schema.parameters["properties"]["text"]["type"], json!("string"));
//! assert_eq!(ParamType::String.json_type(), "string");
//! ```

mod macros;

pub mod config;
pub mod error;
pub mod monitor;
pub mod platform;
pub mod prelude;
pub mod runtime;
pub mod tools;

pub use ragent;
pub use rcommon;
pub use robserve;
pub use rprovider;
pub use rtooling;

pub use config::{Settings, SettingsError};
pub use error::RadiantError;
pub use monitor::{MonitorStart, MonitorSupervisor, Notification, PurchaseMonitor};
pub use platform::{ConsolePlatform, render_error, render_reply};
pub use runtime::{AgentRuntime, Tooling, build_fetcher, build_runtime, build_tooling};
#[cfg(feature = "provider-openai")]
pub use runtime::build_provider;
pub use tools::builtin_registry;
pub use tools::http::{HttpJsonFetcher, JsonFetcher};
pub use tools::market::MarketDataClient;

pub use ragent::{
    AgentConfig, AgentError, AgentErrorKind, CoreAgent, CoreAgentBuilder, DispatchOutcome,
    Dispatcher, FinalReply, InterpretedResponse, NoopTurnHooks, ToolFailure,
    ToolInvocationResult, TurnHooks, TurnPhase, TurnRequest, interpret,
};
pub use rcommon::{BoxFuture, GenerationOptions, MetadataMap, SessionId, TraceId};
pub use rprovider::{
    Message, ModelProvider, ModelRequest, ModelResponse, NoopOperationHooks, OutputItem,
    ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, ProviderOperationHooks,
    RetryPolicy, Role, SecretString, StopReason, TokenUsage, ToolCall, ToolDefinition,
};
pub use rtooling::{
    AgentContext, DefaultToolRuntime, FunctionTool, NoopToolRuntimeHooks, ParamSpec, ParamType,
    Tool, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolFuture,
    ToolRegistry, ToolRuntime, ToolRuntimeHooks, ToolSpec, parse_json_object, required_i64,
    required_string,
};
