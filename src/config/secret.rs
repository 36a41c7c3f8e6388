//! Redacting wrapper for secret configuration values.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder rendered in place of any secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A secret string such as an API key or password.
///
/// Every textual rendering (`Debug`, `Display`, serde serialization) yields
/// [`REDACTED`]. The raw value is only reachable through
/// [`SecretValue::expose_secret`].
///
/// # Example
///
/// ```rust
/// use login_agent::config::SecretValue;
///
/// let key = SecretValue::new("sk-live-123");
/// assert_eq!(key.to_string(), "[REDACTED]");
/// assert_eq!(key.expose_secret(), "sk-live-123");
/// ```
pub struct SecretValue(SecretString);

impl SecretValue {
    /// Wraps a raw secret.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// Returns the raw secret value.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Returns true if the secret is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.expose_secret().trim().is_empty()
    }
}

impl Clone for SecretValue {
    fn clone(&self) -> Self {
        Self::new(self.expose_secret())
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl From<String> for SecretValue {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for SecretValue {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_are_redacted() {
        let secret = SecretValue::new("hunter2");
        assert_eq!(format!("{:?}", secret), REDACTED);
        assert_eq!(format!("{}", secret), REDACTED);
        assert!(!format!("{:#?}", secret).contains("hunter2"));
    }

    #[test]
    fn test_serialize_is_redacted() {
        let secret = SecretValue::new("hunter2");
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, "\"[REDACTED]\"");
    }

    #[test]
    fn test_expose_secret_returns_raw_value() {
        let secret = SecretValue::from("hunter2");
        assert_eq!(secret.expose_secret(), "hunter2");
        assert!(!secret.is_blank());
        assert!(SecretValue::from("  ").is_blank());
    }
}
