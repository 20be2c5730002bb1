use rprovider::ProviderError;
use rtooling::ToolError;

use crate::config::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum RadiantError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("model provider setup failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("tool registration failed: {0}")]
    Tool(#[from] ToolError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
