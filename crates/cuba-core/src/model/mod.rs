//! Data shapes exchanged with the server.

pub mod entity;
pub mod metadata;

pub use entity::EntityHeader;
pub use metadata::{
    AttributeType, Cardinality, Datatype, EntityField, EntityType, EntityView, EnumField,
    EnumType, rust_type_for,
};
