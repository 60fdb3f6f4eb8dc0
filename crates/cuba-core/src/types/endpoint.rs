//! REST API base endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::Error;

/// A validated base URL of a REST API, e.g. `http://localhost:8080/app/rest/v2`.
///
/// # Example
///
/// ```
/// use cuba_core::Endpoint;
///
/// let endpoint = Endpoint::new("http://localhost:8080/app/rest/v2/").unwrap();
/// assert_eq!(endpoint.resource_url("oauth/token"),
///            "http://localhost:8080/app/rest/v2/oauth/token");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Create a new endpoint from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConnectionParameters`](crate::ErrorKind::InvalidConnectionParameters)
    /// error if the URL is not an absolute `http`/`https` URL with a host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| {
            Error::invalid_connection_parameters(format!("incorrect endpoint URI \"{s}\": {e}"))
                .with_source(e)
        })?;

        Self::validate(&url, s)?;
        Ok(Self(url))
    }

    /// Returns the URL of a resource path relative to this endpoint.
    pub fn resource_url(&self, resource: &str) -> String {
        // The URL crate always adds a trailing slash to root paths
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, resource.trim_start_matches('/'))
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(Error::invalid_connection_parameters(format!(
                "endpoint \"{original}\" must be an absolute URL"
            )));
        }

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_connection_parameters(format!(
                "endpoint \"{original}\" must use http or https"
            )));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::invalid_connection_parameters(format!(
                "endpoint \"{original}\" must have a host"
            )));
        }

        Ok(())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Endpoint::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
