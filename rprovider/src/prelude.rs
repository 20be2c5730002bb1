//! Common `rprovider` imports for downstream crates.

pub use crate::{
    Message, ModelProvider, ModelRequest, ModelResponse, NoopOperationHooks,
    OutputItem, ProviderError, ProviderErrorKind, ProviderId, ProviderOperationHooks, RetryPolicy,
    Role, SecretString, StopReason, TokenUsage, ToolCall, ToolDefinition, execute_with_retry,
};
pub use rcommon::{BoxFuture, GenerationOptions, MetadataMap};
