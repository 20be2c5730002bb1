//! Turn-level errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rprovider::{ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentErrorKind {
    InvalidRequest,
    BackendCallFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentError {
    pub kind: AgentErrorKind,
    pub message: String,
    pub attempts: Option<u32>,
}

impl AgentError {
    pub fn new(kind: AgentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            attempts: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::InvalidRequest, message)
    }

    pub fn backend_call_failed(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::BackendCallFailed, message)
    }

    /// Short text safe to show to an end user; detail stays in `message`.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            AgentErrorKind::InvalidRequest => "Sorry, I couldn't understand that request.",
            AgentErrorKind::BackendCallFailed => {
                "Sorry, I'm having trouble responding right now. Please try again later."
            }
        }
    }
}

impl Display for AgentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.attempts {
            Some(attempts) => write!(
                f,
                "{:?} after {} attempts: {}",
                self.kind, attempts, self.message
            ),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for AgentError {}

impl From<ProviderError> for AgentError {
    fn from(value: ProviderError) -> Self {
        let mut error = match value.kind {
            ProviderErrorKind::InvalidRequest => Self::invalid_request(value.message),
            _ => Self::backend_call_failed(value.to_string()),
        };
        error.attempts = value.attempts;
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_provider_error_becomes_backend_call_failed_with_attempts() {
        let last = ProviderError::transport("connection reset");
        let error = AgentError::from(ProviderError::retries_exhausted(3, &last));

        assert_eq!(error.kind, AgentErrorKind::BackendCallFailed);
        assert_eq!(error.attempts, Some(3));
        assert!(error.to_string().contains("after 3 attempts"));
        assert!(!error.user_message().contains("connection reset"));
    }

    #[test]
    fn provider_validation_error_is_invalid_request() {
        let error = AgentError::from(ProviderError::invalid_request("model must not be empty"));
        assert_eq!(error.kind, AgentErrorKind::InvalidRequest);
        assert_eq!(error.message, "model must not be empty");
    }
}
