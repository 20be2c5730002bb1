mod provider;
mod tests;
mod transport;
mod wire;

pub use provider::OpenAiProvider;
pub use transport::{DEFAULT_BASE_URL, OpenAiHttpTransport, OpenAiTransport};
pub use wire::{ChatCompletion, ChatCompletionRequest, ChatFunction, ChatMessage, ChatTool};
