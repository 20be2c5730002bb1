//! Chat-completions transport trait and reqwest-based HTTP implementation.

use reqwest::{Client, Response, StatusCode};

use crate::{ProviderError, ProviderFuture, SecretString};

use super::wire::{ChatCompletion, ChatCompletionRequest, error_message};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Sends one non-streamed completion and decodes the reply body.
pub trait OpenAiTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: ChatCompletionRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ChatCompletion, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct OpenAiHttpTransport {
    client: Client,
    base_url: String,
}

impl OpenAiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| format!("chat completion failed with status {status}"));

        error_for_status(status, message)
    }
}

pub(crate) fn error_for_status(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::authentication(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::timeout(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::invalid_request(message)
        }
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
            ProviderError::unavailable(message)
        }
        _ => ProviderError::transport(message),
    }
}

impl OpenAiTransport for OpenAiHttpTransport {
    fn complete<'a>(
        &'a self,
        request: ChatCompletionRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ChatCompletion, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.completions_url())
                .bearer_auth(api_key.expose())
                .json(&request)
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        ProviderError::timeout(err.to_string())
                    } else {
                        ProviderError::transport(err.to_string())
                    }
                })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response
                .json::<ChatCompletion>()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))
        })
    }
}
