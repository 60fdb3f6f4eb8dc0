//! Wire-level request and response shapes.

use cuba_core::AccessToken;
use serde::Deserialize;

/// HTTP method of a REST call. The API only uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// How a request authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTP Basic with the client id and secret. Used by the token endpoint.
    Client,
    /// `Authorization: Bearer <access token>`.
    Bearer(AccessToken),
}

/// One fully described HTTP request, consumed by [`RestClient::send`](super::RestClient::send).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// Path relative to the endpoint, e.g. `entities/sec$User`.
    pub resource: String,
    pub method: Method,
    /// Ordered parameters: query string for GET and JSON POST, form for bodiless POST.
    pub params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub auth: Auth,
}

impl RequestSpec {
    pub fn new(method: Method, resource: impl Into<String>, auth: Auth) -> Self {
        Self {
            resource: resource.into(),
            method,
            params: Vec::new(),
            body: None,
            auth,
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

    pub fn body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    /// True if this is a token request using `grant_type=refresh_token`.
    pub fn is_refresh_grant(&self) -> bool {
        self.params
            .iter()
            .any(|(name, value)| name == "grant_type" && value == "refresh_token")
    }
}

/// Status and body of a received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Token endpoint path.
pub const OAUTH_TOKEN: &str = "oauth/token";

/// Body of a successful `oauth/token` response. Fields are optional so a
/// missing token surfaces as a parsing error naming the field.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

pub(crate) fn entities_path(metaclass: &str) -> String {
    format!("entities/{metaclass}")
}

pub(crate) fn entity_path(metaclass: &str, id: &str) -> String {
    format!("entities/{metaclass}/{id}")
}

pub(crate) fn query_path(metaclass: &str, query: &str) -> String {
    format!("queries/{metaclass}/{query}")
}

pub(crate) fn service_path(service: &str, method: &str) -> String {
    format!("services/{service}/{method}")
}

pub(crate) const METADATA_ENTITIES: &str = "metadata/entities";
pub(crate) const METADATA_ENUMS: &str = "metadata/enums";
pub(crate) const METADATA_DATATYPES: &str = "metadata/datatypes";

pub(crate) fn entity_metadata_path(metaclass: &str) -> String {
    format!("{METADATA_ENTITIES}/{metaclass}")
}

pub(crate) fn entity_views_path(metaclass: &str) -> String {
    format!("{METADATA_ENTITIES}/{metaclass}/views")
}

pub(crate) fn enum_metadata_path(name: &str) -> String {
    format!("{METADATA_ENUMS}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_grant_detection() {
        let refresh = RequestSpec::new(Method::Post, OAUTH_TOKEN, Auth::Client)
            .param("grant_type", "refresh_token")
            .param("refresh_token", "abc");
        assert!(refresh.is_refresh_grant());

        let password = RequestSpec::new(Method::Post, OAUTH_TOKEN, Auth::Client)
            .param("grant_type", "password");
        assert!(!password.is_refresh_grant());

        let other = RequestSpec::new(Method::Get, "entities/sec$User", Auth::Client)
            .param("refresh_token", "grant_type");
        assert!(!other.is_refresh_grant());
    }

    #[test]
    fn success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(302, "").is_success());
        assert!(!RawResponse::new(401, "").is_success());
    }

    #[test]
    fn resource_paths() {
        assert_eq!(entity_path("std$Produce", "1"), "entities/std$Produce/1");
        assert_eq!(entity_views_path("sec$User"), "metadata/entities/sec$User/views");
        assert_eq!(service_path("app_Svc", "run"), "services/app_Svc/run");
    }
}
