use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use radiant::{
    AgentErrorKind, BoxFuture, JsonFetcher, Message, ModelProvider, ModelRequest, ModelResponse,
    OutputItem, ProviderError, ProviderFuture, ProviderId, Role, Settings, StopReason,
    TokenUsage, ToolError, ToolFailure, ToolInvocationResult, TurnRequest, build_runtime,
    render_error, render_reply,
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ModelResponse, ProviderError>>>,
    calls: Mutex<u32>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<ModelResponse, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().expect("calls lock")
    }
}

fn text_reply(text: &str) -> ModelResponse {
    ModelResponse {
        provider: ProviderId::OpenAiCompatible,
        model: "test-model".to_string(),
        output: vec![OutputItem::Message(Message::new(Role::Assistant, text))],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

impl ModelProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAiCompatible
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            *self.calls.lock().expect("calls lock") += 1;
            self.replies
                .lock()
                .expect("replies lock")
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::other("script exhausted")))
        })
    }
}

#[derive(Debug)]
struct StaticFetcher {
    body: Value,
    urls: Mutex<Vec<String>>,
}

impl JsonFetcher for StaticFetcher {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            self.urls.lock().expect("urls lock").push(url.to_string());
            Ok(self.body.clone())
        })
    }
}

fn settings() -> Settings {
    Settings::from_toml_str(
        r#"
        model_id = "test-model"
        initial_retry_delay_ms = 1
        binance_base_url = "https://binance.test"
        "#,
    )
    .expect("settings")
}

#[tokio::test]
async fn embedded_price_call_is_dispatched_to_binance_tool() {
    let provider = ScriptedProvider::new(vec![Ok(text_reply(
        "Let me check. <function=get_crypto_price>{\"ticker\": \"eth\"}</function>",
    ))]);
    let fetcher = Arc::new(StaticFetcher {
        body: json!({"symbol": "ETHUSDT", "price": "3120.456"}),
        urls: Mutex::new(Vec::new()),
    });
    let (runtime, _notifications) = build_runtime(
        &settings(),
        provider,
        Arc::clone(&fetcher) as Arc<dyn JsonFetcher>,
        CancellationToken::new(),
    )
    .expect("runtime");

    let reply = runtime
        .agent
        .run_turn(
            TurnRequest::new("price of eth?"),
            runtime.console_context("s-1"),
        )
        .await
        .expect("turn");

    assert_eq!(reply.text, None);
    assert_eq!(
        render_reply(&reply),
        "The current price for ETHUSDT: $3120.46"
    );
    assert_eq!(
        *fetcher.urls.lock().expect("urls lock"),
        vec!["https://binance.test/api/v3/ticker/price?symbol=ETHUSDT"]
    );
}

#[tokio::test]
async fn unknown_tool_and_console_image_failures_stay_inside_the_reply() {
    let provider = ScriptedProvider::new(vec![
        Ok(text_reply("<function=launch_rocket>{}</function>")),
        Ok(text_reply(
            "<function=handle_image_generation>{\"prompt\": \"a fox\"}</function>",
        )),
    ]);
    let fetcher = Arc::new(StaticFetcher {
        body: json!({}),
        urls: Mutex::new(Vec::new()),
    });
    let (runtime, _notifications) =
        build_runtime(&settings(), provider, fetcher, CancellationToken::new()).expect("runtime");

    let unknown = runtime
        .agent
        .run_turn(TurnRequest::new("launch"), runtime.console_context("s-1"))
        .await
        .expect("turn completes");
    assert_eq!(
        unknown.tool_result,
        Some(ToolInvocationResult::failure(ToolFailure::UnknownTool))
    );

    let image = runtime
        .agent
        .run_turn(TurnRequest::new("draw a fox"), runtime.console_context("s-1"))
        .await
        .expect("turn completes");
    assert_eq!(image.image_url, None);
    assert_eq!(
        image.tool_result,
        Some(ToolInvocationResult::failure(
            ToolFailure::ToolExecutionFailed
        ))
    );
}

#[tokio::test]
async fn backend_failing_three_times_fails_the_turn() {
    let provider = ScriptedProvider::new(vec![
        Err(ProviderError::unavailable("503")),
        Err(ProviderError::unavailable("503")),
        Err(ProviderError::unavailable("503")),
        Ok(text_reply("too late")),
    ]);
    let fetcher = Arc::new(StaticFetcher {
        body: json!({}),
        urls: Mutex::new(Vec::new()),
    });
    let (runtime, _notifications) = build_runtime(
        &settings(),
        Arc::clone(&provider) as Arc<dyn ModelProvider>,
        fetcher,
        CancellationToken::new(),
    )
    .expect("runtime");

    let error = runtime
        .agent
        .run_turn(TurnRequest::new("hello"), runtime.console_context("s-1"))
        .await
        .expect_err("backend down");

    assert_eq!(error.kind, AgentErrorKind::BackendCallFailed);
    assert_eq!(error.attempts, Some(3));
    assert_eq!(provider.calls(), 3);
    assert!(!render_error(&error).contains("503"));
}
