//! Access token type
//!
//! The token is an opaque credential: nothing in this layer parses or
//! validates its contents, it is only attached to outgoing requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque short-lived access token.
///
/// Absence of a token (modelled as `Option<AccessToken>` in the store)
/// means the client is unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a token from its raw string form.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats the token as an `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Returns true if the token string is empty.
    ///
    /// Backends occasionally answer a refresh with a `200` carrying an
    /// empty credential; callers treat that the same as a failed refresh.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for AccessToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for AccessToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for AccessToken {
    /// Displays a redacted preview, never the full credential.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The token is opaque, so it may contain multi-byte characters;
        // truncation has to happen on character boundaries.
        let chars = self.0.chars().count();
        if chars > 12 {
            let preview: String = self.0.chars().take(8).collect();
            write!(f, "{preview}...")
        } else {
            write!(f, "{}", "*".repeat(chars))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bearer_formatting() {
        let token = AccessToken::new("abc123");
        assert_eq!(token.bearer(), "Bearer abc123");
    }

    #[test]
    fn test_display_redacts_long_tokens() {
        let token = AccessToken::new("abcdefghijklmnop");
        assert_eq!(token.to_string(), "abcdefgh...");
    }

    #[test]
    fn test_display_masks_short_tokens() {
        let token = AccessToken::new("short");
        assert_eq!(token.to_string(), "*****");
    }

    #[test]
    fn test_display_handles_multibyte_tokens() {
        // 5 characters but 15 bytes; byte 8 is mid-character.
        let token = AccessToken::new("€€€€€");
        assert_eq!(token.to_string(), "*****");

        let token = AccessToken::new("€€€€€€€€€€€€€");
        assert_eq!(token.to_string(), "€€€€€€€€...");
    }

    #[test]
    fn test_empty_token() {
        assert!(AccessToken::new("").is_empty());
        assert!(!AccessToken::new("t").is_empty());
    }
}
