//! Shapes returned by the `metadata/*` resources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An entity type declared by the server (`metadata/entities`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityType {
    /// Metaclass name, e.g. `sec$User`.
    pub entity_name: String,
    /// Declared attributes.
    #[serde(default)]
    pub properties: Vec<EntityField>,
}

impl EntityType {
    /// Looks up an attribute by name.
    pub fn property(&self, name: &str) -> Option<&EntityField> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One attribute of an [`EntityType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityField {
    pub name: String,
    /// Whether the attribute holds a value, a relation or an enum.
    pub attribute_type: AttributeType,
    /// A built-in datatype id or a metaclass / enum name.
    #[serde(rename = "type")]
    pub type_name: String,
    pub cardinality: Cardinality,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub persistent: bool,
    #[serde(default)]
    pub transient: bool,
}

impl fmt::Display for EntityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.name,
            self.description.as_deref().unwrap_or(""),
            self.type_name
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    Datatype,
    Composition,
    Association,
    Enum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    None,
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    /// True if the attribute holds a collection.
    pub fn is_collection(&self) -> bool {
        matches!(self, Cardinality::OneToMany | Cardinality::ManyToMany)
    }
}

/// An enumeration declared by the server (`metadata/enums`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    /// Fully-qualified name, e.g. `com.haulmont.cuba.core.global.SendingStatus`.
    pub name: String,
    #[serde(default)]
    pub values: Vec<EnumField>,
}

/// One constant of an [`EnumType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumField {
    pub name: String,
    /// Persisted id; a number or a string depending on the enum.
    pub id: serde_json::Value,
    #[serde(default)]
    pub caption: Option<String>,
}

impl fmt::Display for EnumField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.caption.as_deref().unwrap_or(""))
    }
}

/// A named projection of an entity (`metadata/entities/{type}/views`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub name: String,
    pub entity: String,
    /// Attribute names or nested view descriptors, as sent by the server.
    #[serde(default)]
    pub properties: Vec<serde_json::Value>,
}

/// A built-in datatype (`metadata/datatypes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datatype {
    pub id: String,
    #[serde(default)]
    pub java_class: Option<String>,
}

impl Datatype {
    /// The Rust type a value of this datatype deserializes into, if known.
    pub fn rust_type(&self) -> Option<&'static str> {
        rust_type_for(&self.id)
    }
}

/// Maps a built-in datatype id to the Rust type used for its values.
///
/// `byteArray` and `time` have no mapping yet.
pub fn rust_type_for(datatype: &str) -> Option<&'static str> {
    match datatype {
        "dateTime" | "date" => Some("String"),
        "boolean" => Some("bool"),
        "string" | "uuid" => Some("String"),
        "double" => Some("f64"),
        "decimal" => Some("f64"),
        "int" => Some("i32"),
        "long" => Some("i64"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_entity_type() {
        let value = json!({
            "entityName": "std$Produce",
            "properties": [{
                "name": "brief",
                "attributeType": "DATATYPE",
                "type": "string",
                "cardinality": "NONE",
                "mandatory": true,
                "readOnly": false,
                "description": "Brief",
                "persistent": true,
                "transient": false
            }, {
                "name": "items",
                "attributeType": "COMPOSITION",
                "type": "std$ProduceItem",
                "cardinality": "ONE_TO_MANY"
            }]
        });

        let entity: EntityType = serde_json::from_value(value).unwrap();
        assert_eq!(entity.entity_name, "std$Produce");
        let brief = entity.property("brief").unwrap();
        assert!(brief.mandatory);
        assert_eq!(brief.attribute_type, AttributeType::Datatype);
        assert_eq!(brief.to_string(), "brief, Brief, string");

        let items = entity.property("items").unwrap();
        assert!(items.cardinality.is_collection());
        assert!(!items.persistent);
    }

    #[test]
    fn decodes_enum_with_numeric_ids() {
        let value = json!({
            "name": "com.haulmont.cuba.core.global.SendingStatus",
            "values": [
                {"name": "QUEUE", "id": 0, "caption": "Queued"},
                {"name": "SENT", "id": 200, "caption": "Sent"}
            ]
        });

        let enum_type: EnumType = serde_json::from_value(value).unwrap();
        assert_eq!(enum_type.values.len(), 2);
        assert_eq!(enum_type.values[1].id, json!(200));
        assert_eq!(enum_type.values[1].to_string(), "SENT, Sent");
    }

    #[test]
    fn missing_required_field_fails() {
        let value = json!({"name": "brief", "type": "string"});
        assert!(serde_json::from_value::<EntityField>(value).is_err());
    }

    #[test]
    fn datatype_mapping() {
        let datatype = Datatype {
            id: "long".to_string(),
            java_class: Some("java.lang.Long".to_string()),
        };
        assert_eq!(datatype.rust_type(), Some("i64"));
        assert_eq!(rust_type_for("byteArray"), None);
    }
}
