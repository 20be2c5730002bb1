//! Tool runtime trait and default registry-backed executor.
//!
//! The runtime resolves, parses, coerces, and invokes exactly once. Panics in
//! a tool body surface as `Execution` errors; an elapsed per-call timeout
//! surfaces as `Timeout`. Retrying outbound calls is left to the tool itself.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::FutureExt;
use futures_util::future::{Either, select};
use rprovider::ToolCall;
use serde_json::Value;

use crate::{
    NoopToolRuntimeHooks, ToolError, ToolExecutionContext, ToolExecutionResult, ToolFuture,
    ToolRegistry, ToolRuntimeHooks, coerce_arguments, parse_json_object,
};

pub trait ToolRuntime: Send + Sync {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>>;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
    timeout: Option<Duration>,
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
            timeout: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    async fn run(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<Value, ToolError> {
        let tool = self.registry.resolve(&tool_call.name)?;
        let args = parse_json_object(&tool_call.arguments)?;
        let spec = tool.spec();
        let args = if spec.has_explicit_schema() {
            args
        } else {
            coerce_arguments(&spec.params, args)?
        };

        // Sync handlers run while the future is built, so guard construction too.
        let invocation = match catch_unwind(AssertUnwindSafe(|| tool.invoke(args, context))) {
            Ok(invocation) => invocation,
            Err(payload) => return Err(panicked(payload.as_ref())),
        };
        let invocation = Box::pin(AssertUnwindSafe(invocation).catch_unwind());
        let outcome = match self.timeout {
            None => invocation.await,
            Some(limit) => match select(invocation, Delay::new(limit)).await {
                Either::Left((outcome, _)) => outcome,
                Either::Right(_) => {
                    return Err(ToolError::timeout(format!(
                        "tool did not finish within {}ms",
                        limit.as_millis()
                    )));
                }
            },
        };

        outcome.unwrap_or_else(|payload| Err(panicked(payload.as_ref())))
    }
}

fn panicked(payload: &(dyn Any + Send)) -> ToolError {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    };

    ToolError::execution(format!("tool panicked: {message}"))
}

impl ToolRuntime for DefaultToolRuntime {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            self.hooks.on_execution_start(&tool_call, &context);
            let started = Instant::now();

            match self.run(&tool_call, &context).await {
                Ok(output) => {
                    let result = ToolExecutionResult::from_call(&tool_call, output);
                    self.hooks
                        .on_execution_success(&tool_call, &context, &result, started.elapsed());
                    Ok(result)
                }
                Err(error) => {
                    let error = error.for_call(tool_call.name.clone(), tool_call.id.clone());
                    self.hooks
                        .on_execution_failure(&tool_call, &context, &error, started.elapsed());
                    Err(error)
                }
            }
        })
    }
}
