//! Snapshot cache keyed by connection URL.
//!
//! Introspection is the expensive step, so callers that diff the same
//! database repeatedly hold a cache and reuse the snapshot. The cache is
//! plain owned state: whoever constructs it decides its lifetime, and
//! dropping it invalidates everything at once.

use std::collections::HashMap;

use crate::schema::types::DatabaseSchema;

#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: HashMap<String, DatabaseSchema>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&DatabaseSchema> {
        self.schemas.get(url)
    }

    /// Store a snapshot, replacing any previous one for the same URL.
    pub fn insert(&mut self, url: impl Into<String>, schema: DatabaseSchema) {
        self.schemas.insert(url.into(), schema);
    }

    /// Drop one cached snapshot, returning it if present.
    pub fn invalidate(&mut self, url: &str) -> Option<DatabaseSchema> {
        self.schemas.remove(url)
    }

    pub fn clear(&mut self) {
        self.schemas.clear();
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
