//! OpenAI-compatible provider implementation over a transport.

use std::sync::Arc;

use crate::{
    ModelProvider, ModelRequest, ModelResponse, ProviderError, ProviderFuture, ProviderId,
    SecretString,
};

use super::transport::OpenAiTransport;
use super::wire::ChatCompletionRequest;

#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: SecretString,
    transport: Arc<dyn OpenAiTransport>,
    fallback_model: String,
    provider_id: ProviderId,
}

impl OpenAiProvider {
    pub fn new(api_key: SecretString, transport: Arc<dyn OpenAiTransport>) -> Self {
        Self {
            api_key,
            transport,
            fallback_model: "gpt-4o-mini".to_string(),
            provider_id: ProviderId::OpenAi,
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    /// Reports as `OpenAiCompatible` when the transport targets a non-OpenAI host.
    pub fn with_provider_id(mut self, provider_id: ProviderId) -> Self {
        self.provider_id = provider_id;
        self
    }

    pub(crate) fn chat_request(
        &self,
        request: ModelRequest,
    ) -> Result<ChatCompletionRequest, ProviderError> {
        ChatCompletionRequest::from_model_request(request, &self.fallback_model)
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("transport", &self.transport)
            .field("fallback_model", &self.fallback_model)
            .field("provider_id", &self.provider_id)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        self.provider_id
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            if self.api_key.is_empty() {
                return Err(ProviderError::authentication("no API key configured"));
            }

            let chat_request = self.chat_request(request)?;
            let completion = self.transport.complete(chat_request, &self.api_key).await?;
            completion.into_model_response(self.provider_id)
        })
    }
}
