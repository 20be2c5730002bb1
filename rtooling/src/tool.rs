//! Tool trait contract and closure-backed tools.
//!
//! ```rust
//! use rtooling::{FunctionTool, ParamType, Tool, ToolSpec};
//! use serde_json::Value;
//!
//! let tool = FunctionTool::new(
//!     ToolSpec::new("echo", "Echoes input").param("text", ParamType::String),
//!     |args, _ctx| async move { Ok(Value::Object(args)) },
//! );
//!
//! assert_eq!(tool.spec().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use rcommon::BoxFuture;
use serde_json::{Map, Value};

use crate::{ToolError, ToolExecutionContext, ToolSpec};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait Tool: Send + Sync {
    fn spec(&self) -> &ToolSpec;

    fn invoke<'a>(
        &'a self,
        args: Map<String, Value>,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>>;
}

type ToolHandler = dyn Fn(Map<String, Value>, ToolExecutionContext) -> ToolFuture<'static, Result<Value, ToolError>>
    + Send
    + Sync;

pub struct FunctionTool {
    spec: ToolSpec,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |args, context| Box::pin(handler(args, context)));

        Self { spec, handler }
    }
}

impl Tool for FunctionTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke<'a>(
        &'a self,
        args: Map<String, Value>,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>> {
        (self.handler)(args, context.clone())
    }
}
