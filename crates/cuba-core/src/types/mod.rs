//! Validated REST API identifiers.
//!
//! These types enforce format invariants at construction time, so malformed
//! names are rejected before any request is built.

mod endpoint;
mod entity_id;
mod enum_name;
mod metaclass;

pub use endpoint::Endpoint;
pub use entity_id::EntityId;
pub use enum_name::EnumName;
pub use metaclass::Metaclass;
