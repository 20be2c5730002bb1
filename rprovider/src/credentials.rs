//! Redacted secret values for backend credentials.
//!
//! ```rust
//! use rprovider::SecretString;
//!
//! let key = SecretString::new("sk-live-123");
//! assert_eq!(key.expose(), "sk-live-123");
//! assert_eq!(format!("{key:?}"), "[REDACTED]");
//! ```

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}
