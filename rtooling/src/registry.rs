//! Tool registry keyed by tool name, ordered by registration.

use std::future::Future;
use std::sync::Arc;

use rcommon::Registry;
use rprovider::ToolDefinition;
use serde_json::{Map, Value};

use crate::{FunctionTool, Tool, ToolError, ToolExecutionContext, ToolSpec};

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tool` under its spec name. Names are unique; a second registration fails.
    pub fn register<T>(&mut self, tool: T) -> Result<(), ToolError>
    where
        T: Tool + 'static,
    {
        let name = tool.spec().name.clone();
        if name.trim().is_empty() {
            return Err(ToolError::registration("tool name must not be empty"));
        }

        if self.tools.contains_key(&name) {
            return Err(ToolError::registration(format!(
                "tool '{name}' is already registered"
            ))
            .with_tool_name(name));
        }

        self.tools.insert(name, Arc::new(tool));
        Ok(())
    }

    pub fn register_fn<F, Fut>(&mut self, spec: ToolSpec, handler: F) -> Result<(), ToolError>
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(spec, handler))
    }

    pub fn register_sync_fn<F>(&mut self, spec: ToolSpec, handler: F) -> Result<(), ToolError>
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Result<Value, ToolError>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(spec, move |args, context| {
            let output = handler(args, context);
            async move { output }
        })
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| {
                ToolError::not_found(format!("tool '{name}' is not registered")).with_tool_name(name)
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// One schema per registered tool, in registration order.
    pub fn schemas(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.spec().definition()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
