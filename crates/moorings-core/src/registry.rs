//! Collection registry.
//!
//! The registry is an explicit object constructed once at startup and
//! handed to callers read-only; nothing here is process-wide.

use crate::schema::AttributeSchema;
use std::collections::HashMap;

/// A registered collection: identity, backing table, attribute schema.
#[derive(Debug, Clone)]
pub struct Collection {
    pub identity: String,
    pub table: String,
    pub schema: AttributeSchema,
}

impl Collection {
    /// Collection whose table name is its identity.
    pub fn new(identity: impl Into<String>, schema: AttributeSchema) -> Self {
        let identity = identity.into();
        Self {
            table: identity.clone(),
            identity,
            schema,
        }
    }

    /// Override the backing table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

/// Name → collection lookup, immutable after startup.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    collections: HashMap<String, Collection>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection. A name that is already registered keeps
    /// its first definition.
    pub fn register(&mut self, collection: Collection) {
        self.collections
            .entry(collection.identity.clone())
            .or_insert(collection);
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn schema_for(&self, name: &str) -> Option<&AttributeSchema> {
        self.get(name).map(|collection| &collection.schema)
    }

    pub fn table_name_for(&self, name: &str) -> Option<&str> {
        self.get(name).map(|collection| collection.table.as_str())
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
