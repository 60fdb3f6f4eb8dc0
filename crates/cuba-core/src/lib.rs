//! cuba-core - Core types for the CUBA REST API client.
//!
//! Errors, tokens, credentials, validated identifiers and the metadata model.
//! Networking lives in `cuba-rest`.

pub mod credentials;
pub mod error;
pub mod model;
pub mod params;
pub mod registry;
pub mod tokens;
pub mod types;

pub use credentials::{CredentialDecision, CredentialProvider, CredentialReason, Credentials};
pub use error::{BoxError, Error, ErrorCategory, ErrorKind};
pub use model::{
    AttributeType, Cardinality, Datatype, EntityField, EntityHeader, EntityType, EntityView,
    EnumField, EnumType,
};
pub use params::EntityListParams;
pub use registry::{Entity, TypeRegistry};
pub use tokens::{AccessToken, RefreshToken};
pub use types::{Endpoint, EntityId, EnumName, Metaclass};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
