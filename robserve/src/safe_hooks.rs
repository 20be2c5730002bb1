//! Panic-isolating wrappers so a faulty hook cannot abort a turn.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use ragent::{AgentError, FinalReply, TurnHooks, TurnPhase};
use rcommon::SessionId;
use rprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use rtooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

fn guarded(callback: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        tracing::warn!(phase = "hooks", event = "hook_panicked");
    }
}

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: ProviderOperationHooks> ProviderOperationHooks for SafeProviderHooks<H> {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        guarded(|| self.inner.on_attempt_start(provider, operation, attempt));
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        guarded(|| {
            self.inner
                .on_retry_scheduled(provider, operation, attempt, delay, error)
        });
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        guarded(|| self.inner.on_success(provider, operation, attempts));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        guarded(|| self.inner.on_failure(provider, operation, attempts, error));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: ToolRuntimeHooks> ToolRuntimeHooks for SafeToolHooks<H> {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        guarded(|| self.inner.on_execution_start(tool_call, context));
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        guarded(|| {
            self.inner
                .on_execution_success(tool_call, context, result, elapsed)
        });
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        guarded(|| {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        });
    }
}

pub struct SafeTurnHooks<H> {
    inner: H,
}

impl<H> SafeTurnHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: TurnHooks> TurnHooks for SafeTurnHooks<H> {
    fn on_phase(&self, phase: TurnPhase, session_id: &SessionId, turn_id: &str) {
        guarded(|| self.inner.on_phase(phase, session_id, turn_id));
    }

    fn on_turn_complete(
        &self,
        session_id: &SessionId,
        turn_id: &str,
        reply: &FinalReply,
        elapsed: Duration,
    ) {
        guarded(|| {
            self.inner
                .on_turn_complete(session_id, turn_id, reply, elapsed)
        });
    }

    fn on_turn_failure(
        &self,
        session_id: &SessionId,
        turn_id: &str,
        error: &AgentError,
        elapsed: Duration,
    ) {
        guarded(|| {
            self.inner
                .on_turn_failure(session_id, turn_id, error, elapsed)
        });
    }
}
