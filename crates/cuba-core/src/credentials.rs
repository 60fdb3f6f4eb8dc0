//! User credentials and the credential-provider boundary.

use std::fmt;

/// Username and password for the OAuth password grant.
///
/// Credentials are ephemeral: the client holds them only for the duration of
/// one authenticated call and never persists them.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use cuba_core::Credentials;
///
/// let creds = Credentials::new("admin", "admin");
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// Use this only when constructing token requests or pre-filling a
    /// re-prompt. Never log or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Why the client is asking for credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CredentialReason {
    /// No refresh token is held; this is the first request in this call.
    #[default]
    Empty,
    /// The previously supplied credentials were rejected by the server.
    IncorrectCredentials,
}

/// Answer of a [`CredentialProvider`].
#[derive(Debug, Clone)]
pub enum CredentialDecision {
    /// Try the password grant with these credentials.
    Continue(Credentials),
    /// Abort the call.
    Cancel,
}

/// Supplies credentials when the client holds no refresh token.
///
/// Invoked synchronously from inside an authenticated call; the client
/// enforces no timeout around it. `cached` carries the credentials returned by
/// the previous invocation within the same call, so an interactive provider
/// can pre-fill its prompt.
///
/// Any `Fn(CredentialReason, Option<&Credentials>) -> CredentialDecision`
/// closure is a provider.
pub trait CredentialProvider: Send + Sync {
    /// Ask for credentials.
    fn request_credentials(
        &self,
        reason: CredentialReason,
        cached: Option<&Credentials>,
    ) -> CredentialDecision;
}

impl<F> CredentialProvider for F
where
    F: Fn(CredentialReason, Option<&Credentials>) -> CredentialDecision + Send + Sync,
{
    fn request_credentials(
        &self,
        reason: CredentialReason,
        cached: Option<&Credentials>,
    ) -> CredentialDecision {
        self(reason, cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("admin", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn closures_are_providers() {
        let provider = |reason: CredentialReason, cached: Option<&Credentials>| {
            match (reason, cached) {
                (CredentialReason::IncorrectCredentials, Some(prev)) => {
                    CredentialDecision::Continue(Credentials::new(prev.username(), "retry"))
                }
                (CredentialReason::Empty, None) => {
                    CredentialDecision::Continue(Credentials::new("admin", "admin"))
                }
                _ => CredentialDecision::Cancel,
            }
        };

        let first = provider.request_credentials(CredentialReason::Empty, None);
        let CredentialDecision::Continue(first) = first else {
            panic!("expected credentials");
        };
        assert_eq!(first.username(), "admin");

        let second =
            provider.request_credentials(CredentialReason::IncorrectCredentials, Some(&first));
        let CredentialDecision::Continue(second) = second else {
            panic!("expected credentials");
        };
        assert_eq!(second.password(), "retry");

        assert!(matches!(
            provider.request_credentials(CredentialReason::Empty, Some(&second)),
            CredentialDecision::Cancel
        ));
    }
}
