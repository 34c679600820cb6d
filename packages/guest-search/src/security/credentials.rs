//! API-key handling with secure memory.
//!
//! Uses the `secrecy` crate so provider keys never leak through `Debug`
//! output, log lines, or error messages.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Wrap a key in secure memory.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the key for use in a request header.
    ///
    /// Only call this at the point the key goes onto the wire.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether the wrapped key is non-empty.
    pub fn is_configured(&self) -> bool {
        !self.expose().trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_redact_the_key() {
        let key = SecretString::new("sk-guest-search-key");
        assert_eq!(format!("{:?}", key), "[REDACTED]");
        assert_eq!(format!("{}", key), "[REDACTED]");
    }

    #[test]
    fn expose_returns_the_key() {
        let key = SecretString::new("sk-guest-search-key");
        assert_eq!(key.expose(), "sk-guest-search-key");
    }

    #[test]
    fn blank_keys_are_not_configured() {
        assert!(!SecretString::new("   ").is_configured());
        assert!(SecretString::new("sk-x").is_configured());
    }
}
