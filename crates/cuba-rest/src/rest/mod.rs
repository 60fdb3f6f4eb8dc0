//! REST transport: request shapes, the HTTP executor and response interpretation.

mod executor;
pub mod interpret;
mod request;

pub use executor::{DEFAULT_CLIENT_ID, DEFAULT_CLIENT_SECRET, RestClient, RestConfig};
pub use interpret::{classify_error, classify_response, interpret};
pub use request::{Auth, Method, OAUTH_TOKEN, RawResponse, RequestSpec, TokenResponse};
pub(crate) use request::{
    METADATA_DATATYPES, METADATA_ENTITIES, METADATA_ENUMS, entities_path, entity_metadata_path,
    entity_path, entity_views_path, enum_metadata_path, query_path, service_path,
};
