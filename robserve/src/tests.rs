use std::sync::{Arc, Mutex};
use std::time::Duration;

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};

use ragent::{AgentError, FinalReply, ToolFailure, ToolInvocationResult, TurnHooks, TurnPhase};
use rcommon::SessionId;
use rprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use rtooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};
use serde_json::json;

use crate::{
    FanoutHooks, MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, SafeTurnHooks,
    TracingObservabilityHooks,
};

fn sample_tool_call() -> ToolCall {
    ToolCall {
        id: "call-1".to_string(),
        name: "add".to_string(),
        arguments: r#"{"a":2,"b":3}"#.to_string(),
    }
}

fn sample_tool_context() -> ToolExecutionContext {
    ToolExecutionContext::new("session-1").with_trace_id("trace-1")
}

fn sample_tool_result() -> ToolExecutionResult {
    ToolExecutionResult::new("call-1", "add", json!(5))
}

fn session() -> SessionId {
    SessionId::from("session-1")
}

fn drive_provider(hooks: &dyn ProviderOperationHooks) {
    let error = ProviderError::timeout("provider timeout");
    hooks.on_attempt_start(ProviderId::OpenAi, "complete", 1);
    hooks.on_retry_scheduled(
        ProviderId::OpenAi,
        "complete",
        1,
        Duration::from_millis(10),
        &error,
    );
    hooks.on_success(ProviderId::OpenAi, "complete", 2);
    hooks.on_failure(ProviderId::OpenAi, "complete", 3, &error);
}

fn drive_tool(hooks: &dyn ToolRuntimeHooks) {
    hooks.on_execution_start(&sample_tool_call(), &sample_tool_context());
    hooks.on_execution_success(
        &sample_tool_call(),
        &sample_tool_context(),
        &sample_tool_result(),
        Duration::from_millis(20),
    );
    hooks.on_execution_failure(
        &sample_tool_call(),
        &sample_tool_context(),
        &ToolError::execution("tool failed"),
        Duration::from_millis(20),
    );
}

fn drive_turn(hooks: &dyn TurnHooks) {
    hooks.on_phase(TurnPhase::ToolDispatch, &session(), "turn-1");
    hooks.on_turn_complete(
        &session(),
        "turn-1",
        &FinalReply::from_outcome(
            None,
            Some(ToolInvocationResult::failure(ToolFailure::UnknownTool)),
        ),
        Duration::from_millis(30),
    );
    hooks.on_turn_failure(
        &session(),
        "turn-2",
        &AgentError::backend_call_failed("backend down"),
        Duration::from_millis(30),
    );
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;
    drive_provider(&hooks);
    drive_tool(&hooks);
    drive_turn(&hooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;
    drive_provider(&hooks);
    drive_tool(&hooks);
    drive_turn(&hooks);
    hooks.on_turn_complete(
        &session(),
        "turn-3",
        &FinalReply::from_outcome(Some("hello".to_string()), None),
        Duration::from_millis(5),
    );
}

/// Records the name of every metric registered through it.
#[derive(Default)]
struct KeyLog {
    names: Mutex<Vec<String>>,
}

impl KeyLog {
    fn push(&self, key: &Key) {
        self.names.lock().expect("names lock").push(key.name().to_string());
    }

    fn names(&self) -> Vec<String> {
        self.names.lock().expect("names lock").clone()
    }
}

impl Recorder for KeyLog {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        self.push(key);
        Counter::noop()
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        self.push(key);
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        self.push(key);
        Histogram::noop()
    }
}

#[test]
fn metrics_reach_a_recorder_installed_by_the_host() {
    let recorder = KeyLog::default();
    metrics::with_local_recorder(&recorder, || {
        let hooks = MetricsObservabilityHooks;
        drive_provider(&hooks);
        drive_tool(&hooks);
    });

    let names = recorder.names();
    assert_eq!(names.first().map(String::as_str), Some("radiant_provider_attempt_start_total"));
    assert!(names.iter().any(|name| name == "radiant_provider_retry_delay_seconds"));
    assert!(names.iter().any(|name| name == "radiant_tool_execution_failure_total"));
}

#[derive(Clone)]
struct Recording {
    label: &'static str,
    events: Arc<Mutex<Vec<String>>>,
}

impl Recording {
    fn new(label: &'static str, events: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            events: Arc::clone(events),
        }
    }

    fn push(&self, event: &str) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("{}:{event}", self.label));
    }
}

impl ProviderOperationHooks for Recording {
    fn on_attempt_start(&self, _provider: ProviderId, _operation: &str, _attempt: u32) {
        self.push("attempt_start");
    }

    fn on_retry_scheduled(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        self.push("retry_scheduled");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {
        self.push("success");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        self.push("failure");
    }
}

impl ToolRuntimeHooks for Recording {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        self.push("tool_start");
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        self.push("tool_success");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        self.push("tool_failure");
    }
}

impl TurnHooks for Recording {
    fn on_phase(&self, phase: TurnPhase, _session_id: &SessionId, _turn_id: &str) {
        self.push(phase.as_str());
    }

    fn on_turn_complete(
        &self,
        _session_id: &SessionId,
        _turn_id: &str,
        _reply: &FinalReply,
        _elapsed: Duration,
    ) {
        self.push("turn_complete");
    }

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        _turn_id: &str,
        _error: &AgentError,
        _elapsed: Duration,
    ) {
        self.push("turn_failure");
    }
}

struct Panicking;

impl ProviderOperationHooks for Panicking {
    fn on_attempt_start(&self, _provider: ProviderId, _operation: &str, _attempt: u32) {
        panic!("attempt_start panic");
    }

    fn on_retry_scheduled(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        panic!("retry_scheduled panic");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {
        panic!("success panic");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        panic!("failure panic");
    }
}

impl ToolRuntimeHooks for Panicking {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        panic!("tool start panic");
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        panic!("tool success panic");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        panic!("tool failure panic");
    }
}

impl TurnHooks for Panicking {
    fn on_phase(&self, _phase: TurnPhase, _session_id: &SessionId, _turn_id: &str) {
        panic!("phase panic");
    }

    fn on_turn_complete(
        &self,
        _session_id: &SessionId,
        _turn_id: &str,
        _reply: &FinalReply,
        _elapsed: Duration,
    ) {
        panic!("complete panic");
    }

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        _turn_id: &str,
        _error: &AgentError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }
}

#[test]
fn safe_hooks_delegate_when_inner_succeeds() {
    let events = Arc::new(Mutex::new(Vec::new()));

    drive_provider(&SafeProviderHooks::new(Recording::new("p", &events)));
    drive_tool(&SafeToolHooks::new(Recording::new("t", &events)));
    drive_turn(&SafeTurnHooks::new(Recording::new("r", &events)));

    assert_eq!(
        *events.lock().expect("events lock"),
        vec![
            "p:attempt_start",
            "p:retry_scheduled",
            "p:success",
            "p:failure",
            "t:tool_start",
            "t:tool_success",
            "t:tool_failure",
            "r:tool_dispatch",
            "r:turn_complete",
            "r:turn_failure",
        ]
    );
}

#[test]
fn safe_hooks_swallow_panics() {
    drive_provider(&SafeProviderHooks::new(Panicking));
    drive_tool(&SafeToolHooks::new(Panicking));
    drive_turn(&SafeTurnHooks::new(Panicking));
}

#[test]
fn fanout_calls_both_hook_sets_in_order() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let hooks = FanoutHooks::new(Recording::new("a", &events), Recording::new("b", &events));

    hooks.on_phase(TurnPhase::PlainTextReply, &session(), "turn-1");
    hooks.on_success(ProviderId::OpenAi, "complete", 1);
    hooks.on_execution_start(&sample_tool_call(), &sample_tool_context());

    assert_eq!(
        *events.lock().expect("events lock"),
        vec![
            "a:plain_text_reply",
            "b:plain_text_reply",
            "a:success",
            "b:success",
            "a:tool_start",
            "b:tool_start",
        ]
    );
}

#[test]
fn fanout_of_safe_wrapped_panicking_hook_still_reaches_second() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let hooks = FanoutHooks::new(SafeTurnHooks::new(Panicking), Recording::new("b", &events));

    hooks.on_phase(TurnPhase::Done, &session(), "turn-1");

    assert_eq!(*events.lock().expect("events lock"), vec!["b:done"]);
}
