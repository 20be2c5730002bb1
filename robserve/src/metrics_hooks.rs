//! `metrics` counters and histograms for provider, tool, and turn hooks.
//!
//! Nothing here installs a recorder. Until the host application installs one
//! (`metrics::set_global_recorder` or an exporter crate), every update is
//! discarded.
//!
//! ```rust
//! use robserve::MetricsObservabilityHooks;
//! use rprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! accepts_provider_hooks(&MetricsObservabilityHooks);
//! ```

use std::time::Duration;

use ragent::{AgentError, FinalReply, ToolInvocationResult, TurnHooks, TurnPhase};
use rcommon::SessionId;
use rprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use rtooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, _attempt: u32) {
        metrics::counter!(
            "radiant_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "radiant_provider_retry_scheduled_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "radiant_provider_retry_delay_seconds",
            "provider" => provider.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        metrics::counter!(
            "radiant_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "radiant_provider_attempts_per_success",
            "provider" => provider.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "radiant_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "radiant_provider_attempts_per_failure",
            "provider" => provider.to_string()
        )
        .record(attempts as f64);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "radiant_tool_execution_start_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        metrics::histogram!(
            "radiant_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "radiant_tool_execution_failure_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "radiant_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl TurnHooks for MetricsObservabilityHooks {
    fn on_phase(&self, phase: TurnPhase, _session_id: &SessionId, _turn_id: &str) {
        metrics::counter!("radiant_turn_phase_total", "phase" => phase.as_str()).increment(1);
    }

    fn on_turn_complete(
        &self,
        _session_id: &SessionId,
        _turn_id: &str,
        reply: &FinalReply,
        elapsed: Duration,
    ) {
        let outcome = match &reply.tool_result {
            None => "text",
            Some(ToolInvocationResult::Success(_)) => "tool_success",
            Some(ToolInvocationResult::Error { .. }) => "tool_error",
        };
        metrics::counter!("radiant_turn_complete_total", "outcome" => outcome).increment(1);
        metrics::histogram!("radiant_turn_duration_seconds", "status" => "success")
            .record(elapsed.as_secs_f64());
    }

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        _turn_id: &str,
        error: &AgentError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "radiant_turn_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!("radiant_turn_duration_seconds", "status" => "failure")
            .record(elapsed.as_secs_f64());
    }
}
