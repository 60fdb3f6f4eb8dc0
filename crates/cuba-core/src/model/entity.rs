//! System fields carried by every entity instance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `_entityName`, `_instanceName` and `__securityToken` fields the server
/// adds to every serialized entity.
///
/// Flatten it into local entity types:
///
/// ```
/// use cuba_core::EntityHeader;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Produce {
///     #[serde(flatten)]
///     header: EntityHeader,
///     id: String,
///     brief: Option<String>,
/// }
///
/// let produce: Produce = serde_json::from_str(r#"{
///     "_entityName": "std$Produce",
///     "_instanceName": "Apples",
///     "id": "60885987-1b61-4247-94c7-dff348347f93",
///     "brief": "Apples"
/// }"#).unwrap();
/// assert_eq!(produce.header.to_string(), "Apples");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityHeader {
    #[serde(
        rename = "_entityName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub entity_name: Option<String>,
    #[serde(
        rename = "_instanceName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub instance_name: Option<String>,
    #[serde(
        rename = "__securityToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub security_token: Option<String>,
}

impl fmt::Display for EntityHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.instance_name.as_deref().unwrap_or(""))
    }
}
