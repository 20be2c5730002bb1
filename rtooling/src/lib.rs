//! Tool registry, schema generation, and tool execution runtime.

mod args;
mod error;
mod hooks;
mod registry;
mod runtime;
mod schema;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        AgentContext, DefaultToolRuntime, FunctionTool, ParamSpec, ParamType, Tool, ToolError,
        ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolRegistry,
        ToolRuntime, ToolSpec,
    };
}

pub use args::{
    coerce_arguments, optional_string, parse_json_object, parse_json_value, required_bool,
    required_f64, required_i64, required_string,
};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use runtime::{DefaultToolRuntime, ToolRuntime};
pub use schema::{ParamSpec, ParamType, ToolSpec};
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{AgentContext, ToolExecutionContext, ToolExecutionResult};
