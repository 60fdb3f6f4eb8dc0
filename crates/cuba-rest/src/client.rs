//! High-level CUBA REST API client.

use std::sync::Arc;
use std::time::Duration;

use cuba_core::{
    AccessToken, CredentialProvider, Credentials, Datatype, Endpoint, EntityId, EntityListParams,
    EntityType, EntityView, EnumName, EnumType, Metaclass, RefreshToken, Result, TypeRegistry,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::rest::{self, RestClient, RestConfig};
use crate::session::{RefreshObserver, ResourceRequest, SessionManager, TokenStore};

/// An entity decoded without a local type.
pub type RawEntity = Map<String, Value>;

/// Client for one CUBA REST API endpoint.
///
/// Every operation validates its arguments before any request is sent, then
/// runs through the [`SessionManager`], which obtains and renews tokens as
/// needed.
///
/// # Thread Safety
///
/// Clients are cheap to clone (they use internal `Arc`) and are safe to share
/// across tasks. All clones share one token pair.
///
/// # Example
///
/// ```no_run
/// use cuba_rest::{CubaClient, CredentialDecision, CredentialReason, Credentials, EntityListParams};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Produce {
///     id: String,
///     brief: Option<String>,
/// }
///
/// # async fn example() -> Result<(), cuba_rest::Error> {
/// let client = CubaClient::builder("http://localhost:8080/app/rest/v2")
///     .credential_provider(|_: CredentialReason, _: Option<&Credentials>| {
///         CredentialDecision::Continue(Credentials::new("admin", "admin"))
///     })
///     .register::<Produce>("std$Produce")
///     .build()?;
///
/// let params = EntityListParams::new().limit(10)?;
/// for produce in client.list_entities::<Produce>(&params).await? {
///     println!("{}: {:?}", produce.id, produce.brief);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CubaClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    session: SessionManager,
    registry: TypeRegistry,
}

impl CubaClient {
    /// Start configuring a client for `endpoint`, e.g. `http://host:8080/app/rest/v2`.
    pub fn builder(endpoint: impl Into<String>) -> CubaClientBuilder {
        CubaClientBuilder::new(endpoint)
    }

    /// Returns the endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        self.inner.session.rest().endpoint()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }

    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    /// The refresh token currently held, for persistence.
    pub async fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner.session.tokens().refresh_token().await
    }

    /// The access token currently held, for persistence.
    pub async fn access_token(&self) -> Option<AccessToken> {
        self.inner.session.tokens().snapshot().await.access
    }

    pub async fn has_access_token(&self) -> bool {
        self.inner.session.tokens().has_access_token().await
    }

    /// Log in with the password grant. See [`SessionManager::request_refresh_token`].
    pub async fn request_refresh_token(&self, credentials: &Credentials) -> Result<RefreshToken> {
        self.inner.session.request_refresh_token(credentials).await
    }

    /// Execute an arbitrary authenticated request.
    pub async fn execute<T: DeserializeOwned>(&self, request: ResourceRequest) -> Result<T> {
        self.inner.session.execute(request).await
    }

    /// List entities of the type registered for `T`.
    pub async fn list_entities<T>(&self, params: &EntityListParams) -> Result<Vec<T>>
    where
        T: DeserializeOwned + 'static,
    {
        let metaclass = self.inner.registry.metaclass::<T>()?;
        self.fetch_entities(&metaclass, params).await
    }

    /// List entities of `metaclass` as JSON objects.
    pub async fn list_entities_raw(
        &self,
        metaclass: &str,
        params: &EntityListParams,
    ) -> Result<Vec<RawEntity>> {
        let metaclass = Metaclass::new(metaclass)?;
        self.fetch_entities(&metaclass, params).await
    }

    #[instrument(skip(self, metaclass, params), fields(%metaclass))]
    async fn fetch_entities<T: DeserializeOwned>(
        &self,
        metaclass: &Metaclass,
        params: &EntityListParams,
    ) -> Result<Vec<T>> {
        let request = ResourceRequest::get(rest::entities_path(metaclass.as_str()))
            .params(params.to_query_params());
        self.execute(request).await
    }

    /// Load one entity of the type registered for `T`.
    pub async fn get_entity<T>(&self, id: &str, view: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned + 'static,
    {
        let metaclass = self.inner.registry.metaclass::<T>()?;
        let id = EntityId::new(id)?;
        self.fetch_entity(&metaclass, &id, view).await
    }

    /// Load one entity of `metaclass` as a JSON object.
    pub async fn get_entity_raw(
        &self,
        metaclass: &str,
        id: &str,
        view: Option<&str>,
    ) -> Result<RawEntity> {
        let metaclass = Metaclass::new(metaclass)?;
        let id = EntityId::new(id)?;
        self.fetch_entity(&metaclass, &id, view).await
    }

    #[instrument(skip(self, metaclass, id), fields(%metaclass, %id))]
    async fn fetch_entity<T: DeserializeOwned>(
        &self,
        metaclass: &Metaclass,
        id: &EntityId,
        view: Option<&str>,
    ) -> Result<T> {
        let mut request = ResourceRequest::get(rest::entity_path(metaclass.as_str(), id.as_str()));
        if let Some(view) = view {
            request = request.param("view", view);
        }
        self.execute(request).await
    }

    /// Run the named query declared for the type registered for `T`.
    pub async fn query<T>(&self, name: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + 'static,
    {
        let metaclass = self.inner.registry.metaclass::<T>()?;
        self.run_query(&metaclass, name).await
    }

    /// Run the named query declared for `metaclass`.
    pub async fn query_raw(&self, metaclass: &str, name: &str) -> Result<Vec<RawEntity>> {
        let metaclass = Metaclass::new(metaclass)?;
        self.run_query(&metaclass, name).await
    }

    #[instrument(skip(self, metaclass), fields(%metaclass))]
    async fn run_query<T: DeserializeOwned>(&self, metaclass: &Metaclass, name: &str) -> Result<Vec<T>> {
        self.execute(ResourceRequest::get(rest::query_path(metaclass.as_str(), name)))
            .await
    }

    /// Call a middleware service method; `body` is sent as JSON.
    #[instrument(skip(self, body))]
    pub async fn execute_service<T: DeserializeOwned>(
        &self,
        service: &str,
        method: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let mut request = ResourceRequest::post(rest::service_path(service, method));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }

    /// List entity types, keeping those whose name starts with `prefix`.
    #[instrument(skip(self))]
    pub async fn list_types(&self, prefix: Option<&str>) -> Result<Vec<EntityType>> {
        let types: Vec<EntityType> = self
            .execute(ResourceRequest::get(rest::METADATA_ENTITIES))
            .await?;
        let types = filter_by_prefix(types, prefix, |t| &t.entity_name);
        debug!(count = types.len(), "entity types listed");
        Ok(types)
    }

    pub async fn get_type_metadata(&self, metaclass: &str) -> Result<EntityType> {
        let metaclass = Metaclass::new(metaclass)?;
        self.execute(ResourceRequest::get(rest::entity_metadata_path(
            metaclass.as_str(),
        )))
        .await
    }

    pub async fn list_entity_views(&self, metaclass: &str) -> Result<Vec<EntityView>> {
        let metaclass = Metaclass::new(metaclass)?;
        self.execute(ResourceRequest::get(rest::entity_views_path(
            metaclass.as_str(),
        )))
        .await
    }

    /// List enums, keeping those whose name starts with `prefix`.
    #[instrument(skip(self))]
    pub async fn list_enums(&self, prefix: Option<&str>) -> Result<Vec<EnumType>> {
        let enums: Vec<EnumType> = self
            .execute(ResourceRequest::get(rest::METADATA_ENUMS))
            .await?;
        Ok(filter_by_prefix(enums, prefix, |e| &e.name))
    }

    pub async fn get_enum_metadata(&self, name: &str) -> Result<EnumType> {
        let name = EnumName::new(name)?;
        self.execute(ResourceRequest::get(rest::enum_metadata_path(name.as_str())))
            .await
    }

    /// Ids of the built-in datatypes.
    pub async fn list_datatypes(&self) -> Result<Vec<String>> {
        let datatypes: Vec<Datatype> = self
            .execute(ResourceRequest::get(rest::METADATA_DATATYPES))
            .await?;
        Ok(datatypes.into_iter().map(|d| d.id).collect())
    }
}

fn filter_by_prefix<T>(items: Vec<T>, prefix: Option<&str>, name: impl Fn(&T) -> &String) -> Vec<T> {
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => items
            .into_iter()
            .filter(|item| name(item).starts_with(prefix))
            .collect(),
        None => items,
    }
}

/// Configures a [`CubaClient`].
#[must_use]
pub struct CubaClientBuilder {
    endpoint: String,
    config: RestConfig,
    refresh_token: Option<RefreshToken>,
    access_token: Option<AccessToken>,
    provider: Option<Arc<dyn CredentialProvider>>,
    observer: Option<RefreshObserver>,
    registry: TypeRegistry,
}

impl CubaClientBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: RestConfig::default(),
            refresh_token: None,
            access_token: None,
            provider: None,
            observer: None,
            registry: TypeRegistry::new(),
        }
    }

    /// OAuth client id and secret sent with token requests.
    /// Defaults to the platform's `client` / `secret`.
    pub fn client_credentials(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.config.client_id = id.into();
        self.config.client_secret = secret.into();
        self
    }

    /// Start with a persisted refresh token.
    pub fn refresh_token(mut self, token: RefreshToken) -> Self {
        self.refresh_token = Some(token);
        self
    }

    /// Start with a persisted access token. Ignored without a refresh token.
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Ask `provider` for credentials whenever no refresh token is held.
    pub fn credential_provider(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Called with every refresh token obtained by a password grant.
    pub fn on_refresh_token_updated<F>(mut self, observer: F) -> Self
    where
        F: Fn(&RefreshToken) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Per-request timeout. No timeout by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Replace the type registry.
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register `T` under `api_name` in the type registry.
    pub fn register<T: 'static>(mut self, api_name: impl Into<String>) -> Self {
        self.registry.register::<T>(api_name);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConnectionParameters` for a malformed endpoint or an
    /// empty client id.
    pub fn build(self) -> Result<CubaClient> {
        let endpoint = Endpoint::new(&self.endpoint)?;
        let rest = RestClient::new(endpoint, self.config)?;
        let tokens = TokenStore::new(self.refresh_token, self.access_token);

        let mut session = SessionManager::new(rest, tokens);
        if let Some(provider) = self.provider {
            session = session.with_credential_provider(provider);
        }
        if let Some(observer) = self.observer {
            session = session.with_refresh_observer(observer);
        }

        Ok(CubaClient {
            inner: Arc::new(ClientInner {
                session,
                registry: self.registry,
            }),
        })
    }
}

impl std::fmt::Debug for CubaClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CubaClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("has_provider", &self.provider.is_some())
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuba_core::ErrorKind;

    #[test]
    fn builder_rejects_bad_endpoint() {
        let err = CubaClient::builder("localhost:8080").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConnectionParameters);
    }

    #[test]
    fn builder_rejects_empty_client_id() {
        let err = CubaClient::builder("http://localhost:8080/app/rest/v2")
            .client_credentials("", "secret")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConnectionParameters);
    }

    #[tokio::test]
    async fn builder_seeds_tokens() {
        let client = CubaClient::builder("http://localhost:8080/app/rest/v2")
            .refresh_token(RefreshToken::new("r"))
            .access_token(AccessToken::new("a"))
            .build()
            .unwrap();
        assert_eq!(client.refresh_token().await, Some(RefreshToken::new("r")));
        assert!(client.has_access_token().await);
    }

    #[test]
    fn prefix_filter() {
        let names = vec!["sec$User".to_string(), "std$Produce".to_string()];
        let filtered = filter_by_prefix(names.clone(), Some("sec$"), |n| n);
        assert_eq!(filtered, vec!["sec$User".to_string()]);
        assert_eq!(filter_by_prefix(names.clone(), Some(""), |n| n), names);
        assert_eq!(filter_by_prefix(names.clone(), None, |n| n), names);
    }

    #[tokio::test]
    async fn validation_happens_before_io() {
        // Nothing listens on this port; a request would fail with Connection.
        let client = CubaClient::builder("http://127.0.0.1:9/app/rest/v2")
            .refresh_token(RefreshToken::new("r"))
            .build()
            .unwrap();

        let err = client.get_entity_raw("std$Produce", "not-a-uuid", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);

        let err = client.get_type_metadata("BadName").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);

        let err = client.get_enum_metadata("notAnEnum").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);

        #[derive(Debug, serde::Deserialize)]
        struct Unregistered {}
        let err = client
            .list_entities::<Unregistered>(&EntityListParams::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntityMappingScheme);
    }
}
