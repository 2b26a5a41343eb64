//! Process-wide registry of enumeration types
//!
//! Enumeration identifiers (`enum:<name>`) are only resolvable once the
//! enumeration has been registered. Registration happens implicitly when a
//! column or parameter is declared with the enumeration type, or explicitly
//! through [`register_enum`] before decoding foreign documents.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::enumeration::{EnumDescriptor, Enumeration};

static GLOBAL_REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

/// Registry of enumeration descriptors keyed by type name
#[derive(Debug, Default)]
pub struct TypeRegistry {
    enums: RwLock<HashMap<&'static str, &'static EnumDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register an enumeration descriptor; re-registering is a no-op
    pub fn register_enum(&self, descriptor: &'static EnumDescriptor) {
        if self.enums.read().contains_key(descriptor.name) {
            return;
        }
        self.enums
            .write()
            .entry(descriptor.name)
            .or_insert(descriptor);
    }

    pub fn register<E: Enumeration>(&self) {
        self.register_enum(E::descriptor());
    }

    /// Look up an enumeration by type name
    pub fn enumeration(&self, name: &str) -> Option<&'static EnumDescriptor> {
        self.enums.read().get(name).copied()
    }
}

/// Register an enumeration with the global registry
pub fn register_enum<E: Enumeration>() {
    TypeRegistry::global().register::<E>();
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLOR: EnumDescriptor = EnumDescriptor::new("Color", &[("Red", 0), ("Green", 1)]);

    #[test]
    fn test_register_and_lookup() {
        let registry = TypeRegistry::new();
        assert!(registry.enumeration("Color").is_none());

        registry.register_enum(&COLOR);
        registry.register_enum(&COLOR);

        let descriptor = registry.enumeration("Color").unwrap();
        assert_eq!(descriptor.name_of(1), Some("Green"));
    }
}
