//! The shared core agent: one model call, interpretation, and at most one
//! tool dispatch per turn.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures_timer::Delay;
use rprovider::{
    ModelProvider, ModelRequest, ModelResponse, NoopOperationHooks, ProviderOperationHooks,
    RetryPolicy, execute_with_retry,
};
use rtooling::{
    DefaultToolRuntime, NoopToolRuntimeHooks, ToolExecutionContext, ToolRegistry,
    ToolRuntimeHooks,
};

use crate::{
    AgentConfig, AgentError, Dispatcher, FinalReply, NoopTurnHooks, TurnHooks, TurnPhase,
    TurnRequest, interpret,
};

const COMPLETE_OPERATION: &str = "complete";

pub struct CoreAgent {
    provider: Arc<dyn ModelProvider>,
    registry: Arc<ToolRegistry>,
    dispatcher: Dispatcher,
    config: AgentConfig,
    retry_policy: RetryPolicy,
    provider_hooks: Arc<dyn ProviderOperationHooks>,
    turn_hooks: Arc<dyn TurnHooks>,
    turn_counter: AtomicU64,
}

impl CoreAgent {
    pub fn builder(provider: Arc<dyn ModelProvider>, config: AgentConfig) -> CoreAgentBuilder {
        CoreAgentBuilder::new(provider, config)
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    /// Runs one turn. Tool failures are part of the reply; only an unusable
    /// request or an exhausted model backend fails the turn.
    pub async fn run_turn(
        &self,
        request: TurnRequest,
        context: ToolExecutionContext,
    ) -> Result<FinalReply, AgentError> {
        let context = self.with_turn_id(context);
        let session_id = context.session_id.clone();
        let turn_id = context
            .trace_id
            .as_ref()
            .map(|trace_id| trace_id.to_string())
            .unwrap_or_default();
        let started = Instant::now();

        match self.execute_turn(request, context, &turn_id).await {
            Ok(reply) => {
                self.turn_hooks
                    .on_phase(TurnPhase::Done, &session_id, &turn_id);
                self.turn_hooks
                    .on_turn_complete(&session_id, &turn_id, &reply, started.elapsed());
                Ok(reply)
            }
            Err(error) => {
                tracing::error!(
                    session_id = %session_id,
                    turn_id = %turn_id,
                    attempts = ?error.attempts,
                    error = %error,
                    "turn failed"
                );
                self.turn_hooks
                    .on_turn_failure(&session_id, &turn_id, &error, started.elapsed());
                Err(error)
            }
        }
    }

    /// Plain completion without tool schemas; returns the assistant text.
    pub async fn complete_text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AgentError> {
        let request = ModelRequest::from_prompts(
            self.config.model.clone(),
            system_prompt,
            user_prompt,
        )
        .with_options(self.config.options);
        request.validate()?;

        let response = self.call_model(request).await?;
        Ok(response.text())
    }

    async fn execute_turn(
        &self,
        request: TurnRequest,
        context: ToolExecutionContext,
        turn_id: &str,
    ) -> Result<FinalReply, AgentError> {
        let model_request = self.build_request(&request)?;

        self.turn_hooks
            .on_phase(TurnPhase::AwaitingModelOutput, &context.session_id, turn_id);
        let response = self.call_model(model_request).await?;

        self.turn_hooks
            .on_phase(TurnPhase::Interpreting, &context.session_id, turn_id);
        let interpreted = interpret(&response);

        let outcome = self.dispatcher.dispatch(interpreted, context).await;
        Ok(FinalReply::from_outcome(outcome.text, outcome.tool_result))
    }

    fn build_request(&self, request: &TurnRequest) -> Result<ModelRequest, AgentError> {
        if request.user_prompt.trim().is_empty() {
            return Err(AgentError::invalid_request("user prompt must not be empty"));
        }

        let system_prompt = request
            .system_prompt
            .clone()
            .unwrap_or_else(|| self.config.system_prompt.clone());

        let mut model_request = ModelRequest::from_prompts(
            self.config.model.clone(),
            system_prompt,
            request.user_prompt.clone(),
        )
        .with_options(request.options().or(self.config.options));

        if request.include_tools && !self.registry.is_empty() {
            model_request = model_request.with_tools(self.registry.schemas());
        }

        model_request.validate()?;
        Ok(model_request)
    }

    async fn call_model(&self, request: ModelRequest) -> Result<ModelResponse, AgentError> {
        let provider = Arc::clone(&self.provider);

        let response = execute_with_retry(
            provider.id(),
            COMPLETE_OPERATION,
            &self.retry_policy,
            self.provider_hooks.as_ref(),
            |_attempt| {
                let provider = Arc::clone(&provider);
                let request = request.clone();
                async move { provider.complete(request).await }
            },
            Delay::new,
        )
        .await?;

        Ok(response)
    }

    fn with_turn_id(&self, context: ToolExecutionContext) -> ToolExecutionContext {
        if context.trace_id.is_some() {
            return context;
        }

        let turn = self.turn_counter.fetch_add(1, Ordering::Relaxed) + 1;
        context.with_trace_id(format!("turn-{turn}"))
    }
}

impl std::fmt::Debug for CoreAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreAgent")
            .field("provider", &self.provider.id())
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

pub struct CoreAgentBuilder {
    provider: Arc<dyn ModelProvider>,
    config: AgentConfig,
    registry: Arc<ToolRegistry>,
    retry_policy: RetryPolicy,
    tool_timeout: Option<Duration>,
    provider_hooks: Arc<dyn ProviderOperationHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
    turn_hooks: Arc<dyn TurnHooks>,
}

impl CoreAgentBuilder {
    pub fn new(provider: Arc<dyn ModelProvider>, config: AgentConfig) -> Self {
        Self {
            provider,
            config,
            registry: Arc::new(ToolRegistry::new()),
            retry_policy: RetryPolicy::default(),
            tool_timeout: None,
            provider_hooks: Arc::new(NoopOperationHooks),
            tool_hooks: Arc::new(NoopToolRuntimeHooks),
            turn_hooks: Arc::new(NoopTurnHooks),
        }
    }

    pub fn registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    pub fn provider_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.provider_hooks = hooks;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.tool_hooks = hooks;
        self
    }

    pub fn turn_hooks(mut self, hooks: Arc<dyn TurnHooks>) -> Self {
        self.turn_hooks = hooks;
        self
    }

    pub fn build(self) -> CoreAgent {
        let mut runtime =
            DefaultToolRuntime::new(Arc::clone(&self.registry)).with_hooks(self.tool_hooks);
        if let Some(timeout) = self.tool_timeout {
            runtime = runtime.with_timeout(timeout);
        }

        let dispatcher =
            Dispatcher::new(Arc::new(runtime)).with_hooks(Arc::clone(&self.turn_hooks));

        CoreAgent {
            provider: self.provider,
            registry: self.registry,
            dispatcher,
            config: self.config,
            retry_policy: self.retry_policy,
            provider_hooks: self.provider_hooks,
            turn_hooks: self.turn_hooks,
            turn_counter: AtomicU64::new(0),
        }
    }
}
