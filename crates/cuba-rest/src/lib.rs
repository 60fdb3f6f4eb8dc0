//! cuba-rest - Authenticated client for the CUBA Platform REST API v2.
//!
//! All authenticated operations flow through a [`CubaClient`], which obtains
//! tokens with the OAuth password and refresh grants and retries a call a
//! bounded number of times when a token expires or the connection drops.
//!
//! # Example
//!
//! ```no_run
//! use cuba_rest::{CubaClient, Credentials, RefreshToken};
//!
//! # async fn example() -> Result<(), cuba_rest::Error> {
//! let client = CubaClient::builder("http://localhost:8080/app/rest/v2")
//!     .client_credentials("client", "secret")
//!     .on_refresh_token_updated(|token: &RefreshToken| {
//!         // persist the token somewhere
//!         let _ = token;
//!     })
//!     .build()?;
//!
//! client.request_refresh_token(&Credentials::new("admin", "admin")).await?;
//!
//! for entity in client.list_types(Some("sec$")).await? {
//!     println!("{}", entity.entity_name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod rest;
pub mod session;

pub use client::{CubaClient, CubaClientBuilder, RawEntity};
pub use session::{MAX_ATTEMPTS, ResourceRequest, SessionManager, TokenStore};

// Re-export core types so most users need a single dependency
pub use cuba_core::{
    AccessToken, CredentialDecision, CredentialProvider, CredentialReason, Credentials, Endpoint,
    Entity, EntityHeader, EntityId, EntityListParams, EnumName, Error, ErrorCategory, ErrorKind,
    Metaclass, RefreshToken, Result, TypeRegistry, model,
};
