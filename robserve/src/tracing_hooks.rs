//! `tracing` events for every provider, tool, and turn hook.
//!
//! ```rust
//! use ragent::TurnHooks;
//! use robserve::TracingObservabilityHooks;
//!
//! fn accepts_turn_hooks(_hooks: &dyn TurnHooks) {}
//!
//! accepts_turn_hooks(&TracingObservabilityHooks);
//! ```

use std::time::Duration;

use ragent::{AgentError, FinalReply, TurnHooks, TurnPhase};
use rcommon::SessionId;
use rprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use rtooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        tracing::debug!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "provider",
            event = "retry_scheduled",
            provider = %provider,
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            session_id = %context.session_id,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            session_id = %context.session_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}

impl TurnHooks for TracingObservabilityHooks {
    fn on_phase(&self, phase: TurnPhase, session_id: &SessionId, turn_id: &str) {
        tracing::debug!(
            phase = "turn",
            event = "phase",
            turn_phase = phase.as_str(),
            session_id = %session_id,
            turn_id
        );
    }

    fn on_turn_complete(
        &self,
        session_id: &SessionId,
        turn_id: &str,
        reply: &FinalReply,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "turn",
            event = "complete",
            session_id = %session_id,
            turn_id,
            has_text = reply.text.is_some(),
            has_image = reply.image_url.is_some(),
            tool_success = reply.tool_result.as_ref().map(|result| result.is_success()),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_turn_failure(
        &self,
        session_id: &SessionId,
        turn_id: &str,
        error: &AgentError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "turn",
            event = "failure",
            session_id = %session_id,
            turn_id,
            error_kind = ?error.kind,
            attempts = error.attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            error = %error
        );
    }
}
