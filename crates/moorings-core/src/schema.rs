//! Canonical attribute schemas.
//!
//! A schema maps column names to declared attributes. It is built once —
//! either from the record layer's definitions or by a dialect's schema
//! normalizer — and read by both statement builders (DDL, column lists)
//! and codecs (type-driven casting). Column order is significant: DDL
//! emits columns in definition order.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Declared type tag for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Array,
    Json,
}

impl AttributeType {
    /// Parse one of the record layer's type spellings.
    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "text" => Self::Text,
            "integer" | "int" => Self::Integer,
            "float" | "double" => Self::Float,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "array" => Self::Array,
            "json" => Self::Json,
            _ => return None,
        };
        Some(kind)
    }
}

impl<'de> Deserialize<'de> for AttributeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name).unwrap_or_else(|| {
            // Unknown spellings get the widest column rather than an error.
            warn!(r#type = %name, "unknown attribute type, treating as text");
            Self::Text
        }))
    }
}

/// One column's declared shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(rename = "primaryKey")]
    pub primary_key: bool,
    pub unique: bool,
    pub indexed: bool,
    #[serde(rename = "defaultValue")]
    pub default_value: Option<Value>,
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            kind: AttributeType::String,
            primary_key: false,
            unique: false,
            indexed: false,
            default_value: None,
        }
    }
}

impl Attribute {
    /// Plain attribute of the given type, no constraints.
    pub fn of(kind: AttributeType) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// Insertion-ordered column name → attribute mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSchema {
    attributes: Vec<(String, Attribute)>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, builder style.
    pub fn with(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.insert(name, attribute);
        self
    }

    /// Add a column, or redefine one in place keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, attribute: Attribute) {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = attribute,
            None => self.attributes.push((name, attribute)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, attribute)| attribute)
    }

    /// Columns in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes
            .iter()
            .map(|(name, attribute)| (name.as_str(), attribute))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<'de> Deserialize<'de> for AttributeSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = AttributeSchema;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column attributes")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut schema = AttributeSchema::new();
                while let Some((name, attribute)) = map.next_entry::<String, Attribute>()? {
                    schema.insert(name, attribute);
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_spellings() {
        assert_eq!(AttributeType::parse("int"), Some(AttributeType::Integer));
        assert_eq!(AttributeType::parse("DOUBLE"), Some(AttributeType::Float));
        assert_eq!(AttributeType::parse("datetime"), Some(AttributeType::DateTime));
        assert_eq!(AttributeType::parse("uuid"), None);
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let attribute: Attribute = serde_json::from_value(json!({"type": "uuid"})).unwrap();
        assert_eq!(attribute.kind, AttributeType::Text);
    }

    #[test]
    fn test_schema_deserializes_in_definition_order() {
        let schema: AttributeSchema = serde_json::from_value(json!({
            "id": {"type": "integer", "primaryKey": true},
            "name": {"type": "string"},
            "active": {"type": "boolean", "defaultValue": true},
        }))
        .unwrap();

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "name", "active"]);

        let id = schema.get("id").unwrap();
        assert!(id.primary_key);
        assert_eq!(id.kind, AttributeType::Integer);
        assert_eq!(
            schema.get("active").unwrap().default_value,
            Some(json!(true))
        );
    }

    #[test]
    fn test_insert_redefines_in_place() {
        let mut schema = AttributeSchema::new()
            .with("a", Attribute::default())
            .with("b", Attribute::default());
        schema.insert("a", Attribute::of(AttributeType::Integer));

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(schema.get("a").unwrap().kind, AttributeType::Integer);
        assert_eq!(schema.len(), 2);
    }
}
