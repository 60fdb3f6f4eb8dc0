//! Error types for the CUBA REST client.
//!
//! Every failure is an [`Error`] carrying a closed [`ErrorKind`] tag, a
//! human-readable message, the HTTP status when one was received, and an
//! optional underlying cause. Kinds are grouped into [`ErrorCategory`] values
//! so callers can ask "is this any kind of access error?" without matching
//! every variant.

use std::fmt;

use thiserror::Error;

/// Boxed underlying cause of an [`Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The origin group of an [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller error detected before any network I/O.
    Configuration,
    /// The server could not be reached or did not speak HTTP.
    Connectivity,
    /// A response arrived but could not be turned into the expected value.
    ResponseParsing,
    /// Authentication or authorization failed.
    Access,
    /// The requested resource does not exist.
    Resource,
    /// The server reported an error this client has no mapping for.
    Unclassified,
}

/// Specific classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Endpoint, client credentials, username or token missing or malformed.
    InvalidConnectionParameters,
    /// A metaclass name, entity id, enum name or list parameter is malformed.
    InvalidFormat,
    /// A local type has no (or an empty) registered API name.
    EntityMappingScheme,
    /// Server unreachable or the response had no HTTP semantics.
    Connection,
    /// Body could not be decoded into the expected shape.
    Deserialization,
    /// Well-formed response missing a field the client requires.
    ResponseParsing,
    /// Credentials or bearer header rejected.
    AccessRejected,
    /// Bearer token present but expired or invalid.
    AccessTokenExpired,
    /// Refresh token no longer accepted by the token endpoint.
    RefreshTokenExpired,
    /// Every attempt of an authenticated call failed.
    RetriesExhausted {
        /// Number of attempts that were made.
        attempts: u32,
    },
    /// The credential provider declined to continue.
    Cancelled,
    /// No such endpoint or resource.
    NotFound,
    /// Unknown entity type name.
    MetaclassNotFound,
    /// No entity instance with the requested id.
    EntityNotFound,
    /// Unknown view name.
    ViewNotFound,
    /// Server error without a specific mapping.
    Unclassified,
}

impl ErrorKind {
    /// Returns the origin group this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::InvalidConnectionParameters
            | ErrorKind::InvalidFormat
            | ErrorKind::EntityMappingScheme => ErrorCategory::Configuration,
            ErrorKind::Connection => ErrorCategory::Connectivity,
            ErrorKind::Deserialization | ErrorKind::ResponseParsing => {
                ErrorCategory::ResponseParsing
            }
            ErrorKind::AccessRejected
            | ErrorKind::AccessTokenExpired
            | ErrorKind::RefreshTokenExpired
            | ErrorKind::RetriesExhausted { .. }
            | ErrorKind::Cancelled => ErrorCategory::Access,
            ErrorKind::NotFound
            | ErrorKind::MetaclassNotFound
            | ErrorKind::EntityNotFound
            | ErrorKind::ViewNotFound => ErrorCategory::Resource,
            ErrorKind::Unclassified => ErrorCategory::Unclassified,
        }
    }

    /// True for any authentication or authorization failure.
    pub fn is_access(&self) -> bool {
        self.category() == ErrorCategory::Access
    }

    /// True for any "does not exist" failure, generic or specific.
    pub fn is_resource(&self) -> bool {
        self.category() == ErrorCategory::Resource
    }

    /// True for caller errors raised before any I/O.
    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// True for kinds the session retry loop recovers from locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Connection | ErrorKind::AccessTokenExpired | ErrorKind::RefreshTokenExpired
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidConnectionParameters => f.write_str("invalid connection parameters"),
            ErrorKind::InvalidFormat => f.write_str("invalid format"),
            ErrorKind::EntityMappingScheme => f.write_str("entity mapping scheme mismatch"),
            ErrorKind::Connection => f.write_str("connection failure"),
            ErrorKind::Deserialization => f.write_str("deserialization failure"),
            ErrorKind::ResponseParsing => f.write_str("response parsing failure"),
            ErrorKind::AccessRejected => f.write_str("access rejected"),
            ErrorKind::AccessTokenExpired => f.write_str("access token expired"),
            ErrorKind::RefreshTokenExpired => f.write_str("refresh token expired"),
            ErrorKind::RetriesExhausted { attempts } => {
                write!(f, "access failed after {attempts} attempt(s)")
            }
            ErrorKind::Cancelled => f.write_str("cancelled"),
            ErrorKind::NotFound => f.write_str("not found"),
            ErrorKind::MetaclassNotFound => f.write_str("metaclass not found"),
            ErrorKind::EntityNotFound => f.write_str("entity not found"),
            ErrorKind::ViewNotFound => f.write_str("view not found"),
            ErrorKind::Unclassified => f.write_str("unclassified server error"),
        }
    }
}

/// The unified error type for CUBA REST operations.
#[derive(Debug, Error)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Create a new error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Attach the HTTP status code of the response that caused this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn invalid_connection_parameters(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConnectionParameters, message)
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFormat, message)
    }

    pub fn entity_mapping(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EntityMappingScheme, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    pub fn response_parsing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResponseParsing, message)
    }

    /// Attempts were exhausted; `last` is the most recent recoverable failure.
    pub fn retries_exhausted(attempts: u32, last: Option<Error>) -> Self {
        let error = Self::new(
            ErrorKind::RetriesExhausted { attempts },
            format!("failed to get a correct access token after {attempts} attempt(s)"),
        );
        match last {
            Some(last) => error.with_source(last),
            None => error,
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message (server detail or client description).
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code, if a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the kind of the wrapped cause when it is itself an [`Error`].
    pub fn inner_kind(&self) -> Option<ErrorKind> {
        self.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<Error>())
            .map(Error::kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        Ok(())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::Deserialization, "response can not be parsed as JSON").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn display_includes_kind_message_and_status() {
        let err = Error::new(ErrorKind::EntityNotFound, "no such sale").with_status(404);
        assert_eq!(err.to_string(), "entity not found: no such sale (HTTP 404)");
    }

    #[test]
    fn group_membership() {
        assert!(ErrorKind::AccessTokenExpired.is_access());
        assert!(ErrorKind::RefreshTokenExpired.is_access());
        assert!(ErrorKind::RetriesExhausted { attempts: 5 }.is_access());
        assert!(ErrorKind::MetaclassNotFound.is_resource());
        assert!(ErrorKind::NotFound.is_resource());
        assert!(ErrorKind::InvalidFormat.is_configuration());
        assert!(!ErrorKind::Unclassified.is_access());
        assert_eq!(
            ErrorKind::Deserialization.category(),
            ErrorCategory::ResponseParsing
        );
    }

    #[test]
    fn recoverable_kinds() {
        assert!(ErrorKind::Connection.is_recoverable());
        assert!(ErrorKind::AccessTokenExpired.is_recoverable());
        assert!(ErrorKind::RefreshTokenExpired.is_recoverable());
        assert!(!ErrorKind::AccessRejected.is_recoverable());
        assert!(!ErrorKind::ViewNotFound.is_recoverable());
    }

    #[test]
    fn retries_exhausted_wraps_last_cause() {
        let last = Error::connection("connection refused");
        let err = Error::retries_exhausted(5, Some(last));
        assert_eq!(err.kind(), ErrorKind::RetriesExhausted { attempts: 5 });
        assert_eq!(err.inner_kind(), Some(ErrorKind::Connection));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("5 attempt(s)"));
    }

    #[test]
    fn json_errors_become_deserialization() {
        let json_err = serde_json::from_str::<u32>("<html>").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
        assert!(err.inner_kind().is_none());
    }
}
