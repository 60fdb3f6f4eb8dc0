//! OAuth token types.

use std::fmt;

/// A short-lived bearer token for authenticated REST calls.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the token string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A longer-lived token used to mint new access tokens without a password.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in refresh-grant requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the token string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Hide token value in Debug output
impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_hides_value_in_debug() {
        let token = AccessToken::new("8f3c5a3e-access");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("8f3c5a3e"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn refresh_token_hides_value_in_debug() {
        let token = RefreshToken::new("refresh_token_value_here");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("refresh_token_value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn tokens_compare_by_value() {
        assert_eq!(RefreshToken::new("a"), RefreshToken::new("a"));
        assert_ne!(AccessToken::new("a"), AccessToken::new("b"));
        assert!(RefreshToken::new("").is_empty());
    }
}
