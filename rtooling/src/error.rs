//! Errors raised while registering, resolving, or running a tool.
//!
//! Retryability follows from the kind: only [`ToolErrorKind::Transient`] and
//! [`ToolErrorKind::Timeout`] are worth another attempt, and only a tool's own
//! retry loop acts on that. The runtime never retries.
//!
//! ```rust
//! use rtooling::{ToolError, ToolErrorKind};
//!
//! let error = ToolError::transient("price feed returned 503").for_call("get_crypto_price", "call_7");
//! assert!(error.is_retryable());
//! assert_eq!(error.kind, ToolErrorKind::Transient);
//! assert_eq!(
//!     error.to_string(),
//!     "transient failure in get_crypto_price (call call_7): price feed returned 503"
//! );
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// No tool is registered under the requested name.
    NotFound,
    InvalidArguments,
    /// The tool body failed; final.
    Execution,
    /// An outbound call failed in a way that may succeed on a later attempt.
    Transient,
    Timeout,
    Registration,
    Other,
}

impl ToolErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "unknown tool",
            Self::InvalidArguments => "invalid arguments",
            Self::Execution => "execution failure",
            Self::Transient => "transient failure",
            Self::Timeout => "timeout",
            Self::Registration => "registration failure",
            Self::Other => "tool error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
    pub tool_call_id: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
            tool_call_id: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Transient, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message)
    }

    pub fn registration(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Registration, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    /// Attaches both the tool name and the id of the call that failed.
    pub fn for_call(self, tool_name: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        let mut error = self.with_tool_name(tool_name);
        error.tool_call_id = Some(tool_call_id.into());
        error
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ToolErrorKind::Transient | ToolErrorKind::Timeout)
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(tool_name) = &self.tool_name {
            write!(f, " in {tool_name}")?;
        }
        if let Some(tool_call_id) = &self.tool_call_id {
            write!(f, " (call {tool_call_id})")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::{ToolError, ToolErrorKind};

    #[test]
    fn only_transient_and_timeout_errors_are_retryable() {
        let retryable = [ToolError::transient("429"), ToolError::timeout("slow feed")];
        let final_errors = [
            ToolError::execution("404 for pair"),
            ToolError::invalid_arguments("ticker missing"),
            ToolError::not_found("no such tool"),
            ToolError::registration("duplicate"),
            ToolError::other("lock poisoned"),
        ];

        assert!(retryable.iter().all(ToolError::is_retryable));
        assert!(!final_errors.iter().any(ToolError::is_retryable));
    }

    #[test]
    fn display_names_the_tool_only_when_known() {
        assert_eq!(
            ToolError::invalid_arguments("`a` is required").to_string(),
            "invalid arguments: `a` is required"
        );
        assert_eq!(
            ToolError::not_found("not registered")
                .with_tool_name("launch_rocket")
                .to_string(),
            "unknown tool in launch_rocket: not registered"
        );

        let error = ToolError::execution("overflow").for_call("multiply", "call_2");
        assert_eq!(error.kind, ToolErrorKind::Execution);
        assert_eq!(error.tool_call_id.as_deref(), Some("call_2"));
    }
}
