//! Backend error kinds and error value helpers.
//!
//! ```rust
//! use rprovider::ProviderError;
//!
//! let auth = ProviderError::authentication("bad key");
//! assert!(!auth.retryable);
//!
//! let timeout = ProviderError::timeout("temporary timeout");
//! assert!(timeout.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    Unavailable,
    RetriesExhausted,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
    pub attempts: Option<u32>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            attempts: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message, true)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message, false)
    }

    /// Terminal error raised once the retry budget is spent; wraps the last cause.
    pub fn retries_exhausted(attempts: u32, last: &ProviderError) -> Self {
        let mut error = Self::new(
            ProviderErrorKind::RetriesExhausted,
            format!("all {attempts} attempts failed, last error: {last}"),
            false,
        );
        error.attempts = Some(attempts);
        error
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_exhausted_is_terminal_and_keeps_cause() {
        let last = ProviderError::unavailable("503 from backend");
        let error = ProviderError::retries_exhausted(3, &last);

        assert_eq!(error.kind, ProviderErrorKind::RetriesExhausted);
        assert_eq!(error.attempts, Some(3));
        assert!(!error.retryable);
        assert!(error.message.contains("503 from backend"));
    }
}
