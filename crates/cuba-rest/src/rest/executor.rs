//! HTTP transport.

use std::time::Duration;

use cuba_core::{Endpoint, Error, Result};
use tracing::{debug, instrument, trace};

use super::request::{Auth, Method, RawResponse, RequestSpec};

/// Platform default OAuth client id.
pub const DEFAULT_CLIENT_ID: &str = "client";
/// Platform default OAuth client secret.
pub const DEFAULT_CLIENT_SECRET: &str = "secret";

/// Transport settings for a [`RestClient`].
#[derive(Clone)]
pub struct RestConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    /// Per-request timeout; none by default.
    pub timeout: Option<Duration>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: DEFAULT_CLIENT_SECRET.to_string(),
            user_agent: concat!("cuba-rest/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sends single requests to one REST endpoint and returns the raw response.
///
/// Performs no classification and no retry. A request that produced no HTTP
/// response fails with a `Connection` error.
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    endpoint: Endpoint,
    client_id: String,
    client_secret: String,
}

impl RestClient {
    /// Create a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConnectionParameters` if the client id is empty or the
    /// HTTP client can not be built.
    pub fn new(endpoint: Endpoint, config: RestConfig) -> Result<Self> {
        if config.client_id.is_empty() {
            return Err(Error::invalid_connection_parameters(
                "client id can not be empty",
            ));
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::invalid_connection_parameters("failed to build HTTP client").with_source(e)
        })?;

        Ok(Self {
            client,
            endpoint,
            client_id: config.client_id,
            client_secret: config.client_secret,
        })
    }

    /// Returns the endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send one request.
    #[instrument(skip(self, request), fields(method = request.method.as_str(), resource = %request.resource))]
    pub async fn send(&self, request: &RequestSpec) -> Result<RawResponse> {
        let url = self.endpoint.resource_url(&request.resource);
        debug!(%url, "sending request");

        let builder = match (request.method, &request.body) {
            (Method::Get, _) => self.client.get(&url).query(&request.params),
            (Method::Post, Some(body)) => self.client.post(&url).query(&request.params).json(body),
            (Method::Post, None) => self.client.post(&url).form(&request.params),
        };

        let builder = match &request.auth {
            Auth::Client => builder.basic_auth(&self.client_id, Some(&self.client_secret)),
            Auth::Bearer(token) => builder.bearer_auth(token.as_str()),
        };

        let response = builder.send().await.map_err(connection_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(connection_error)?;

        trace!(status, len = body.len(), "response received");
        Ok(RawResponse { status, body })
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Maps a transport failure to a `Connection` error.
fn connection_error(err: reqwest::Error) -> Error {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "failed to connect to server".to_string()
    } else {
        format!("request failed: {err}")
    };
    Error::connection(message).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuba_core::ErrorKind;

    #[test]
    fn client_creation() {
        let endpoint = Endpoint::new("http://localhost:8080/app/rest/v2").unwrap();
        let client = RestClient::new(endpoint.clone(), RestConfig::default()).unwrap();
        assert_eq!(client.endpoint(), &endpoint);
    }

    #[test]
    fn empty_client_id_rejected() {
        let endpoint = Endpoint::new("http://localhost:8080/app/rest/v2").unwrap();
        let config = RestConfig {
            client_id: String::new(),
            ..RestConfig::default()
        };
        let err = RestClient::new(endpoint, config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConnectionParameters);
    }

    #[test]
    fn debug_hides_secret() {
        let config = RestConfig {
            client_secret: "topsecret".to_string(),
            ..RestConfig::default()
        };
        assert!(!format!("{config:?}").contains("topsecret"));
    }
}
