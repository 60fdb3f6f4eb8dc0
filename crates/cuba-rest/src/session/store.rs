//! Shared token state.

use cuba_core::{AccessToken, RefreshToken};
use tokio::sync::RwLock;
use tracing::debug;

/// A consistent view of the held token pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access: Option<AccessToken>,
    pub refresh: Option<RefreshToken>,
}

/// Holds the access and refresh token of one client under a single lock.
///
/// A held access token was always issued against the held refresh token.
/// Writers name the token they acted on, so a late writer can not overwrite a
/// newer state: an access token minted from a refresh token that is no longer
/// held is dropped, and invalidation only clears the token that was actually
/// used.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<SessionTokens>,
}

impl TokenStore {
    /// Create a store seeded with persisted tokens. Empty tokens count as absent.
    ///
    /// An access token without a refresh token is discarded.
    pub fn new(refresh: Option<RefreshToken>, access: Option<AccessToken>) -> Self {
        let refresh = refresh.filter(|t| !t.is_empty());
        let access = access.filter(|t| !t.is_empty() && refresh.is_some());
        Self {
            tokens: RwLock::new(SessionTokens { access, refresh }),
        }
    }

    /// Returns both tokens as one consistent pair.
    pub async fn snapshot(&self) -> SessionTokens {
        self.tokens.read().await.clone()
    }

    pub async fn refresh_token(&self) -> Option<RefreshToken> {
        self.tokens.read().await.refresh.clone()
    }

    pub async fn has_access_token(&self) -> bool {
        self.tokens.read().await.access.is_some()
    }

    /// Replace both tokens after a password grant.
    pub async fn replace_all(&self, refresh: RefreshToken, access: Option<AccessToken>) {
        let mut tokens = self.tokens.write().await;
        tokens.refresh = Some(refresh);
        tokens.access = access.filter(|t| !t.is_empty());
        debug!(has_access = tokens.access.is_some(), "session tokens replaced");
    }

    /// Store an access token minted from `issued_for`.
    ///
    /// Returns false, leaving the store untouched, if `issued_for` is no
    /// longer the held refresh token.
    pub async fn store_access_token(&self, issued_for: &RefreshToken, token: AccessToken) -> bool {
        let mut tokens = self.tokens.write().await;
        if tokens.refresh.as_ref() != Some(issued_for) {
            debug!("refresh token changed while minting, access token dropped");
            return false;
        }
        tokens.access = Some(token);
        true
    }

    /// Forget the access token if it is still `used`.
    pub async fn invalidate_access_token(&self, used: &AccessToken) -> bool {
        let mut tokens = self.tokens.write().await;
        if tokens.access.as_ref() == Some(used) {
            tokens.access = None;
            true
        } else {
            false
        }
    }

    /// Forget both tokens if the refresh token is still `used_refresh`.
    pub async fn invalidate_all(&self, used_refresh: &RefreshToken) -> bool {
        let mut tokens = self.tokens.write().await;
        if tokens.refresh.as_ref() == Some(used_refresh) {
            *tokens = SessionTokens::default();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refresh(s: &str) -> RefreshToken {
        RefreshToken::new(s)
    }

    fn access(s: &str) -> AccessToken {
        AccessToken::new(s)
    }

    #[tokio::test]
    async fn seeding_ignores_empty_and_orphaned_tokens() {
        let store = TokenStore::new(Some(refresh("")), Some(access("a")));
        assert_eq!(store.snapshot().await, SessionTokens::default());

        let store = TokenStore::new(Some(refresh("r")), Some(access("")));
        assert!(!store.has_access_token().await);
    }

    #[tokio::test]
    async fn stale_access_token_is_refused() {
        let store = TokenStore::new(Some(refresh("r2")), None);
        assert!(!store.store_access_token(&refresh("r1"), access("a1")).await);
        assert!(!store.has_access_token().await);

        assert!(store.store_access_token(&refresh("r2"), access("a2")).await);
        assert_eq!(store.snapshot().await.access, Some(access("a2")));
    }

    #[tokio::test]
    async fn invalidation_compares_tokens() {
        let store = TokenStore::new(Some(refresh("r")), Some(access("new")));

        assert!(!store.invalidate_access_token(&access("old")).await);
        assert!(store.has_access_token().await);

        assert!(store.invalidate_access_token(&access("new")).await);
        assert!(!store.has_access_token().await);
        assert_eq!(store.refresh_token().await, Some(refresh("r")));
    }

    #[tokio::test]
    async fn invalidate_all_clears_pair() {
        let store = TokenStore::new(Some(refresh("r")), Some(access("a")));
        assert!(!store.invalidate_all(&refresh("other")).await);
        assert!(store.invalidate_all(&refresh("r")).await);
        assert_eq!(store.snapshot().await, SessionTokens::default());
    }

    #[tokio::test]
    async fn replace_all_swaps_pair() {
        let store = TokenStore::new(Some(refresh("r1")), Some(access("a1")));
        store.replace_all(refresh("r2"), None).await;
        let tokens = store.snapshot().await;
        assert_eq!(tokens.refresh, Some(refresh("r2")));
        assert_eq!(tokens.access, None);
    }
}
