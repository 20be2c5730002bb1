//! Model backend contracts, request/response model, retry policy, and the
//! OpenAI-compatible chat-completions adapter.

mod credentials;
mod error;
mod model;
mod provider;
mod resilience;

pub mod adapters;
pub mod prelude;

pub use credentials::SecretString;
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    Message, ModelRequest, ModelResponse, OutputItem, ProviderId, Role,
    StopReason, TokenUsage, ToolCall, ToolDefinition,
};
pub use provider::{ModelProvider, ProviderFuture};
pub use resilience::{
    NoopOperationHooks, ProviderOperationHooks, RetryPolicy, execute_with_retry,
};
