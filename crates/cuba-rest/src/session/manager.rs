//! Authenticated execution with bounded recovery.

use std::fmt;
use std::sync::Arc;

use cuba_core::{
    AccessToken, CredentialDecision, CredentialProvider, CredentialReason, Credentials, Error,
    ErrorKind, RefreshToken, Result,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::store::TokenStore;
use crate::rest::{self, Auth, Method, OAUTH_TOKEN, RequestSpec, RestClient, TokenResponse};

/// Upper bound on attempts made by one [`SessionManager::execute`] call.
pub const MAX_ATTEMPTS: u32 = 5;

/// Callback invoked with each refresh token obtained by a password grant.
pub type RefreshObserver = Arc<dyn Fn(&RefreshToken) + Send + Sync>;

/// A resource call without authentication details.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub resource: String,
    pub method: Method,
    pub params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ResourceRequest {
    pub fn get(resource: impl Into<String>) -> Self {
        Self::new(Method::Get, resource)
    }

    pub fn post(resource: impl Into<String>) -> Self {
        Self::new(Method::Post, resource)
    }

    fn new(method: Method, resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            method,
            params: Vec::new(),
            body: None,
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    fn to_spec(&self, access: &AccessToken) -> RequestSpec {
        RequestSpec::new(self.method, self.resource.clone(), Auth::Bearer(access.clone()))
            .params(self.params.iter().cloned())
            .body(self.body.clone())
    }
}

/// State of one `execute` call.
#[derive(Default)]
struct RetryContext {
    attempts: u32,
    last_error: Option<Error>,
    reason: CredentialReason,
    cached: Option<Credentials>,
}

/// Runs authenticated requests, obtaining and renewing tokens as needed.
///
/// Each call gets at most [`MAX_ATTEMPTS`] attempts. An expired access token
/// is dropped and re-minted, an expired refresh token sends the caller back to
/// the credential provider, and connection failures are retried as is. Every
/// other error ends the call.
pub struct SessionManager {
    rest: RestClient,
    tokens: TokenStore,
    provider: Option<Arc<dyn CredentialProvider>>,
    observer: Option<RefreshObserver>,
}

impl SessionManager {
    pub fn new(rest: RestClient, tokens: TokenStore) -> Self {
        Self {
            rest,
            tokens,
            provider: None,
            observer: None,
        }
    }

    /// Ask `provider` for credentials whenever no refresh token is held.
    pub fn with_credential_provider(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Notify `observer` of every new refresh token.
    pub fn with_refresh_observer(mut self, observer: RefreshObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Execute an authenticated request and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// - `Cancelled` if the credential provider cancels
    /// - `InvalidConnectionParameters` if credentials are needed and no provider is set
    /// - `RetriesExhausted` wrapping the last recoverable error after [`MAX_ATTEMPTS`]
    /// - any non-recoverable classified error, unchanged
    #[instrument(skip(self, request), fields(method = request.method.as_str(), resource = %request.resource))]
    pub async fn execute<T: DeserializeOwned>(&self, request: ResourceRequest) -> Result<T> {
        let mut ctx = RetryContext::default();

        while ctx.attempts < MAX_ATTEMPTS {
            ctx.attempts += 1;
            debug!(attempt = ctx.attempts, "executing request");

            if let Some(value) = self.attempt(&request, &mut ctx).await? {
                return Ok(value);
            }
        }

        warn!(attempts = ctx.attempts, "giving up");
        Err(Error::retries_exhausted(ctx.attempts, ctx.last_error))
    }

    /// One attempt. `Ok(None)` means the attempt failed recoverably.
    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &ResourceRequest,
        ctx: &mut RetryContext,
    ) -> Result<Option<T>> {
        let tokens = self.tokens.snapshot().await;

        let (refresh, access) = match tokens.refresh {
            Some(refresh) => (refresh, tokens.access),
            None => {
                let credentials = self.ask_credentials(ctx)?;
                match self.password_grant(&credentials).await {
                    Ok(tokens) => tokens,
                    Err(error) if error.kind() == ErrorKind::AccessRejected => {
                        warn!(%error, "credentials rejected");
                        ctx.reason = CredentialReason::IncorrectCredentials;
                        ctx.last_error = Some(error);
                        return Ok(None);
                    }
                    Err(error) => return Err(error),
                }
            }
        };

        let access = match access {
            Some(access) => access,
            None => match self.mint_access_token(&refresh).await {
                Ok(access) => access,
                Err(error) => return self.recover(error, ctx, &refresh, None).await.map(|()| None),
            },
        };

        let spec = request.to_spec(&access);
        let result = match self.rest.send(&spec).await {
            Ok(response) => rest::interpret::<T>(&response, false),
            Err(error) => Err(error),
        };

        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) => self
                .recover(error, ctx, &refresh, Some(&access))
                .await
                .map(|()| None),
        }
    }

    /// Apply the recovery for `error`, or hand it back if it is not recoverable.
    async fn recover(
        &self,
        error: Error,
        ctx: &mut RetryContext,
        refresh: &RefreshToken,
        access: Option<&AccessToken>,
    ) -> Result<()> {
        match error.kind() {
            ErrorKind::AccessTokenExpired => {
                info!("access token expired, requesting a new one");
                if let Some(access) = access {
                    self.tokens.invalidate_access_token(access).await;
                }
            }
            ErrorKind::RefreshTokenExpired => {
                info!("refresh token expired, authentication required");
                self.tokens.invalidate_all(refresh).await;
            }
            ErrorKind::Connection => {
                warn!(%error, "connection failed");
            }
            _ => return Err(error),
        }

        ctx.last_error = Some(error);
        Ok(())
    }

    fn ask_credentials(&self, ctx: &mut RetryContext) -> Result<Credentials> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            Error::invalid_connection_parameters(
                "no refresh token is held and no credential provider is configured",
            )
        })?;

        debug!(reason = ?ctx.reason, "requesting credentials");
        match provider.request_credentials(ctx.reason, ctx.cached.as_ref()) {
            CredentialDecision::Continue(credentials) => {
                ctx.cached = Some(credentials.clone());
                Ok(credentials)
            }
            CredentialDecision::Cancel => Err(Error::new(
                ErrorKind::Cancelled,
                "credential request was cancelled",
            )),
        }
    }

    /// Obtain a refresh token with the password grant and store it.
    ///
    /// Both held tokens are replaced and the refresh observer is notified.
    ///
    /// # Errors
    ///
    /// - `InvalidConnectionParameters` if the username is empty (no request is sent)
    /// - `ResponseParsing` if the server response has no refresh token; the
    ///   held tokens are left unchanged
    /// - any classified error of the token request
    #[instrument(skip(self, credentials), fields(username = credentials.username()))]
    pub async fn request_refresh_token(&self, credentials: &Credentials) -> Result<RefreshToken> {
        let (refresh, _) = self.password_grant(credentials).await?;
        Ok(refresh)
    }

    async fn password_grant(
        &self,
        credentials: &Credentials,
    ) -> Result<(RefreshToken, Option<AccessToken>)> {
        if credentials.username().is_empty() {
            return Err(Error::invalid_connection_parameters(
                "username can not be empty",
            ));
        }

        info!("requesting refresh token");
        let spec = RequestSpec::new(Method::Post, OAUTH_TOKEN, Auth::Client)
            .param("grant_type", "password")
            .param("username", credentials.username())
            .param("password", credentials.password());
        let response: TokenResponse = self.token_request(&spec).await?;

        let refresh = response
            .refresh_token
            .filter(|t| !t.is_empty())
            .map(RefreshToken::new)
            .ok_or_else(|| Error::response_parsing("refresh token is missing in server response"))?;
        let access = response
            .access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::new);

        self.tokens
            .replace_all(refresh.clone(), access.clone())
            .await;

        if let Some(observer) = &self.observer {
            observer(&refresh);
        }

        debug!("refresh token obtained");
        Ok((refresh, access))
    }

    /// Mint an access token from `refresh` with the refresh grant.
    ///
    /// Does not touch the held tokens.
    ///
    /// # Errors
    ///
    /// - `InvalidConnectionParameters` if `refresh` is empty (no request is sent)
    /// - `ResponseParsing` if the server response has no access token
    /// - any classified error of the token request; a rejected refresh token
    ///   is `RefreshTokenExpired`
    #[instrument(skip_all)]
    pub async fn request_access_token(&self, refresh: &RefreshToken) -> Result<AccessToken> {
        if refresh.is_empty() {
            return Err(Error::invalid_connection_parameters(
                "refresh token can not be empty",
            ));
        }

        debug!("requesting access token");
        let spec = RequestSpec::new(Method::Post, OAUTH_TOKEN, Auth::Client)
            .param("grant_type", "refresh_token")
            .param("refresh_token", refresh.as_str());
        let response: TokenResponse = self.token_request(&spec).await?;

        response
            .access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| Error::response_parsing("access token is missing in server response"))
    }

    async fn mint_access_token(&self, refresh: &RefreshToken) -> Result<AccessToken> {
        let access = self.request_access_token(refresh).await?;
        self.tokens
            .store_access_token(refresh, access.clone())
            .await;
        Ok(access)
    }

    async fn token_request(&self, spec: &RequestSpec) -> Result<TokenResponse> {
        let response = self.rest.send(spec).await?;
        rest::interpret(&response, spec.is_refresh_grant())
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("rest", &self.rest)
            .field("tokens", &"[REDACTED]")
            .field("has_provider", &self.provider.is_some())
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_request_builder() {
        let request = ResourceRequest::post("services/app_Svc/run")
            .param("a", "1")
            .json(serde_json::json!({"x": 1}));
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.params, vec![("a".to_string(), "1".to_string())]);

        let spec = request.to_spec(&AccessToken::new("t"));
        assert_eq!(spec.auth, Auth::Bearer(AccessToken::new("t")));
        assert!(spec.body.is_some());
        assert!(!spec.is_refresh_grant());
    }
}
