//! Explicit mapping from local Rust types to server API names.
//!
//! Typed operations such as listing `Vec<Produce>` need to know that
//! `Produce` is `std$Produce` on the server. The mapping is an explicit table
//! built at startup (by hand or by generated code), looked up by [`TypeId`].

use std::any::{TypeId, type_name};
use std::collections::HashMap;

use crate::error::Error;
use crate::types::{EnumName, Metaclass};

/// A local type mirroring a server entity, with its metaclass name known at
/// compile time. Code generators implement this; registering such a type
/// needs no explicit name.
pub trait Entity: 'static {
    /// Server metaclass name, e.g. `"std$Produce"`.
    const METACLASS: &'static str;
}

#[derive(Debug, Clone)]
struct Registration {
    rust_name: &'static str,
    api_name: String,
}

/// Table of local type → API name registrations.
///
/// # Example
///
/// ```
/// use cuba_core::TypeRegistry;
///
/// struct Produce;
/// struct Unmapped;
///
/// let registry = TypeRegistry::new().with::<Produce>("std$Produce");
/// assert_eq!(registry.metaclass::<Produce>().unwrap().as_str(), "std$Produce");
/// assert!(registry.metaclass::<Unmapped>().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    names: HashMap<TypeId, Registration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `api_name`, replacing any earlier registration.
    pub fn register<T: 'static>(&mut self, api_name: impl Into<String>) -> &mut Self {
        self.names.insert(
            TypeId::of::<T>(),
            Registration {
                rust_name: type_name::<T>(),
                api_name: api_name.into(),
            },
        );
        self
    }

    /// Register an [`Entity`] under its declared metaclass name.
    pub fn register_entity<T: Entity>(&mut self) -> &mut Self {
        self.register::<T>(T::METACLASS)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<T: 'static>(mut self, api_name: impl Into<String>) -> Self {
        self.register::<T>(api_name);
        self
    }

    /// Builder-style [`register_entity`](Self::register_entity).
    pub fn with_entity<T: Entity>(mut self) -> Self {
        self.register_entity::<T>();
        self
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the raw API name registered for `T`.
    ///
    /// # Errors
    ///
    /// Returns an [`EntityMappingScheme`](crate::ErrorKind::EntityMappingScheme)
    /// error if `T` is not registered or was registered with an empty name.
    pub fn api_name<T: 'static>(&self) -> Result<&str, Error> {
        let registration = self.names.get(&TypeId::of::<T>()).ok_or_else(|| {
            Error::entity_mapping(format!(
                "{} has no registered REST API name",
                type_name::<T>()
            ))
        })?;

        if registration.api_name.is_empty() {
            return Err(Error::entity_mapping(format!(
                "{} is registered with an empty REST API name",
                registration.rust_name
            )));
        }

        Ok(&registration.api_name)
    }

    /// Returns the validated entity metaclass registered for `T`.
    pub fn metaclass<T: 'static>(&self) -> Result<Metaclass, Error> {
        Metaclass::new(self.api_name::<T>()?)
    }

    /// Returns the validated enum name registered for `T`.
    pub fn enum_name<T: 'static>(&self) -> Result<EnumName, Error> {
        EnumName::new(self.api_name::<T>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    struct Produce;
    struct Unregistered;
    struct Blank;
    struct SendingStatus;

    struct Order;
    impl Entity for Order {
        const METACLASS: &'static str = "sales$Order";
    }

    #[test]
    fn lookup_registered_type() {
        let registry = TypeRegistry::new()
            .with::<Produce>("std$Produce")
            .with_entity::<Order>()
            .with::<SendingStatus>("com.haulmont.cuba.core.global.SendingStatus");

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.metaclass::<Produce>().unwrap().as_str(), "std$Produce");
        assert_eq!(registry.metaclass::<Order>().unwrap().as_str(), "sales$Order");
        assert_eq!(
            registry.enum_name::<SendingStatus>().unwrap().simple_name(),
            "SendingStatus"
        );
    }

    #[test]
    fn missing_registration_is_mapping_error() {
        let registry = TypeRegistry::new();
        let err = registry.metaclass::<Unregistered>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntityMappingScheme);
        assert!(err.message().contains("Unregistered"));
    }

    #[test]
    fn empty_name_is_mapping_error() {
        let registry = TypeRegistry::new().with::<Blank>("");
        let err = registry.api_name::<Blank>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntityMappingScheme);
    }

    #[test]
    fn malformed_name_is_format_error() {
        let registry = TypeRegistry::new().with::<Produce>("Produce");
        let err = registry.metaclass::<Produce>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn register_replaces_earlier_name() {
        let mut registry = TypeRegistry::new();
        registry
            .register::<Produce>("std$Produce")
            .register::<Produce>("std$Fruit");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.api_name::<Produce>().unwrap(), "std$Fruit");
    }
}
