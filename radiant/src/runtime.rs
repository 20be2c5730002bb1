//! Wiring from [`Settings`] to a ready [`CoreAgent`] with built-in tools,
//! observability hooks, and the purchase-monitor supervisor.

use std::sync::Arc;
use std::time::Duration;

use ragent::CoreAgent;
use robserve::{
    FanoutHooks, MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, SafeTurnHooks,
    TracingObservabilityHooks,
};
use rprovider::ModelProvider;
use rtooling::{ToolExecutionContext, ToolRegistry};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::error::RadiantError;
use crate::monitor::{MonitorSupervisor, Notification};
use crate::platform::ConsolePlatform;
use crate::tools::builtin_registry;
use crate::tools::http::{HttpJsonFetcher, JsonFetcher};
use crate::tools::market::MarketDataClient;

pub const NOTIFICATION_BUFFER: usize = 64;
const LLM_HTTP_TIMEOUT: Duration = Duration::from_secs(90);

pub struct AgentRuntime {
    pub agent: Arc<CoreAgent>,
    pub market: Arc<MarketDataClient>,
    pub monitors: Arc<MonitorSupervisor>,
}

impl AgentRuntime {
    /// Execution context for a console session, with the console platform
    /// attached for tools that call back into it.
    pub fn console_context(&self, session_id: impl Into<rcommon::SessionId>) -> ToolExecutionContext {
        ToolExecutionContext::new(session_id).with_agent(Arc::new(ConsolePlatform))
    }

    pub fn shutdown(&self) {
        self.monitors.stop_all();
    }
}

impl std::fmt::Debug for AgentRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRuntime")
            .field("model", &self.agent.config().model)
            .field("tools", &self.agent.registry().names())
            .field("monitors", &self.monitors)
            .finish_non_exhaustive()
    }
}

fn observability() -> FanoutHooks<TracingObservabilityHooks, MetricsObservabilityHooks> {
    FanoutHooks::new(TracingObservabilityHooks, MetricsObservabilityHooks)
}

#[cfg(feature = "provider-openai")]
pub fn build_provider(settings: &Settings) -> Result<Arc<dyn ModelProvider>, RadiantError> {
    use rprovider::ProviderId;
    use rprovider::adapters::openai::{DEFAULT_BASE_URL, OpenAiHttpTransport, OpenAiProvider};

    let api_key = settings.api_key()?;
    let client = reqwest::Client::builder().timeout(LLM_HTTP_TIMEOUT).build()?;
    let transport = OpenAiHttpTransport::new(client).with_base_url(settings.llm_base_url.clone());

    let provider_id = if settings.llm_base_url.trim_end_matches('/') == DEFAULT_BASE_URL {
        ProviderId::OpenAi
    } else {
        ProviderId::OpenAiCompatible
    };

    Ok(Arc::new(
        OpenAiProvider::new(api_key, Arc::new(transport))
            .with_fallback_model(settings.model_id.clone())
            .with_provider_id(provider_id),
    ))
}

pub fn build_fetcher(settings: &Settings) -> Result<Arc<dyn JsonFetcher>, RadiantError> {
    Ok(Arc::new(HttpJsonFetcher::with_timeout(settings.http_timeout())?))
}

/// The built-in tools and what they share: the market client and the
/// monitor supervisor whose notifications arrive on `notifications`.
pub struct Tooling {
    pub registry: ToolRegistry,
    pub market: Arc<MarketDataClient>,
    pub monitors: Arc<MonitorSupervisor>,
    pub notifications: mpsc::Receiver<Notification>,
}

/// Monitors stop when `shutdown` fires.
pub fn build_tooling(
    settings: &Settings,
    fetcher: Arc<dyn JsonFetcher>,
    shutdown: CancellationToken,
) -> Result<Tooling, RadiantError> {
    let market = Arc::new(
        MarketDataClient::new(
            fetcher,
            settings.binance_base_url.clone(),
            settings.dexscreener_base_url.clone(),
        )
        .with_retry_policy(settings.retry_policy()),
    );

    let (sender, notifications) = mpsc::channel(NOTIFICATION_BUFFER);
    let monitors = Arc::new(MonitorSupervisor::new(
        Arc::clone(&market),
        settings.monitor_poll_interval(),
        sender,
        shutdown,
    ));

    let registry = builtin_registry(&market, &monitors)?;

    Ok(Tooling {
        registry,
        market,
        monitors,
        notifications,
    })
}

pub fn build_runtime(
    settings: &Settings,
    provider: Arc<dyn ModelProvider>,
    fetcher: Arc<dyn JsonFetcher>,
    shutdown: CancellationToken,
) -> Result<(AgentRuntime, mpsc::Receiver<Notification>), RadiantError> {
    let Tooling {
        registry,
        market,
        monitors,
        notifications,
    } = build_tooling(settings, fetcher, shutdown)?;
    tracing::info!(tools = ?registry.names(), model = %settings.model_id, "tool registry ready");

    let agent = CoreAgent::builder(provider, settings.agent_config())
        .registry(Arc::new(registry))
        .retry_policy(settings.retry_policy())
        .tool_timeout(settings.tool_timeout())
        .provider_hooks(Arc::new(SafeProviderHooks::new(observability())))
        .tool_hooks(Arc::new(SafeToolHooks::new(observability())))
        .turn_hooks(Arc::new(SafeTurnHooks::new(observability())))
        .build();

    Ok((
        AgentRuntime {
            agent: Arc::new(agent),
            market,
            monitors,
        },
        notifications,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rcommon::BoxFuture;
    use rprovider::{
        Message, ModelProvider, ModelRequest, ModelResponse, OutputItem, ProviderError,
        ProviderFuture, ProviderId, Role, StopReason, TokenUsage, ToolCall,
    };
    use rtooling::ToolError;
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;

    use super::build_runtime;
    use crate::config::Settings;
    use crate::tools::http::JsonFetcher;
    use crate::{ToolInvocationResult, TurnRequest};

    #[derive(Debug, Default)]
    struct AddingProvider {
        requests: Mutex<Vec<ModelRequest>>,
    }

    impl ModelProvider for AddingProvider {
        fn id(&self) -> ProviderId {
            ProviderId::OpenAiCompatible
        }

        fn complete<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
            Box::pin(async move {
                request.validate()?;
                let model = request.model.clone();
                self.requests.lock().expect("requests lock").push(request);
                Ok(ModelResponse {
                    provider: ProviderId::OpenAiCompatible,
                    model,
                    output: vec![OutputItem::ToolCall(ToolCall {
                        id: "call-1".to_string(),
                        name: "add".to_string(),
                        arguments: r#"{"a":"2","b":3}"#.to_string(),
                    })],
                    stop_reason: StopReason::ToolUse,
                    usage: TokenUsage::default(),
                })
            })
        }
    }

    #[derive(Debug)]
    struct OfflineFetcher;

    impl JsonFetcher for OfflineFetcher {
        fn get_json<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<Value, ToolError>> {
            Box::pin(async { Err(ToolError::execution("offline")) })
        }
    }

    #[tokio::test]
    async fn built_runtime_offers_builtin_tools_and_dispatches_add() {
        let settings = Settings::from_toml_str("model_id = \"local-model\"").expect("settings");
        let provider = Arc::new(AddingProvider::default());
        let (runtime, _notifications) = build_runtime(
            &settings,
            Arc::clone(&provider) as Arc<dyn ModelProvider>,
            Arc::new(OfflineFetcher),
            CancellationToken::new(),
        )
        .expect("runtime builds");

        let reply = runtime
            .agent
            .run_turn(
                TurnRequest::new("what's 2+3"),
                runtime.console_context("console-1"),
            )
            .await
            .expect("turn completes");

        assert_eq!(reply.text, None);
        assert_eq!(reply.tool_result, Some(ToolInvocationResult::Success(json!(5))));

        let requests = provider.requests.lock().expect("requests lock");
        let request = &requests[0];
        assert_eq!(request.model, "local-model");
        assert_eq!(request.tools.len(), 6);
        assert_eq!(request.options.temperature, Some(0.7));
        assert_eq!(request.options.max_tokens, Some(500));
        assert_eq!(request.messages[0], Message::new(Role::System, settings.system_prompt.clone()));
    }
}
