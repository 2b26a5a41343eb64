//! Property list cache
//!
//! Property lists are computed once per record type and shared afterwards.
//! Lookups take a read lock; only the first sighting of a type writes.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::{PropertyInfo, Record};

static GLOBAL_CACHE: Lazy<PropertyCache> = Lazy::new(PropertyCache::new);

/// Thread-safe cache of property lists keyed by record type
#[derive(Debug, Default)]
pub struct PropertyCache {
    entries: RwLock<HashMap<TypeId, Arc<[PropertyInfo]>>>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static PropertyCache {
        &GLOBAL_CACHE
    }

    /// Properties of the item's type, computed on first use
    pub fn properties(&self, item: &dyn Record) -> Arc<[PropertyInfo]> {
        let key = item.record_type_id();
        if let Some(properties) = self.entries.read().get(&key) {
            return Arc::clone(properties);
        }

        let mut entries = self.entries.write();
        Arc::clone(
            entries
                .entry(key)
                .or_insert_with(|| Arc::from(item.properties())),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
