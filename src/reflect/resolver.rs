//! Property path resolution
//!
//! Resolves dotted expressions such as `Address.City` against a record.
//! When a path reaches a map property, the rest of the expression (dots
//! included) is taken as one map key, so `Attributes.cost.center` reads the
//! key `cost.center`.

use super::cache::PropertyCache;
use super::{PropertyInfo, PropertyType, PropertyValue, Record};
use crate::value::Value;

const PATH_SEPARATOR: char = '.';

/// Terminal property of a resolved path
#[derive(Debug)]
pub struct ResolvedProperty<'a> {
    pub property: PropertyInfo,
    pub value: PropertyValue<'a>,
    /// Map key, for paths ending inside a map
    pub dictionary_key: Option<String>,
    key_present: bool,
}

impl<'a> ResolvedProperty<'a> {
    fn new(property: PropertyInfo, value: PropertyValue<'a>) -> Self {
        Self {
            property,
            value,
            dictionary_key: None,
            key_present: false,
        }
    }

    /// Column name for this resolution: the map key or the property name
    pub fn name(&self) -> &str {
        self.dictionary_key.as_deref().unwrap_or(self.property.name)
    }

    /// Whether the path ended inside a map and the map holds the key.
    ///
    /// A missing key and a key mapped to `null` both resolve to a null value;
    /// this tells them apart.
    pub fn contains_dictionary_key(&self) -> bool {
        self.dictionary_key.is_some() && self.key_present
    }
}

/// Resolves property paths using a shared [`PropertyCache`]
#[derive(Debug, Clone, Copy)]
pub struct PropertyResolver<'c> {
    cache: &'c PropertyCache,
}

impl Default for PropertyResolver<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyResolver<'static> {
    pub fn new() -> Self {
        Self {
            cache: PropertyCache::global(),
        }
    }
}

impl<'c> PropertyResolver<'c> {
    pub fn with_cache(cache: &'c PropertyCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &'c PropertyCache {
        self.cache
    }

    /// Resolve a dotted expression against an item.
    ///
    /// Returns `None` for an absent item, a blank expression, an unknown
    /// property or a path running through a null or non-record value.
    pub fn resolve<'a>(
        &self,
        item: Option<&'a dyn Record>,
        expression: &str,
    ) -> Option<ResolvedProperty<'a>> {
        let mut current = item?;
        let mut expression = expression;

        loop {
            if expression.trim().is_empty() {
                return None;
            }

            let properties = self.cache.properties(current);
            let (name, remainder) = match expression.find(PATH_SEPARATOR) {
                Some(index) if index > 0 => (&expression[..index], Some(&expression[index + 1..])),
                _ => (expression, None),
            };
            let remainder = remainder.filter(|rest| !rest.trim().is_empty());

            let property = properties.iter().find(|p| p.name == name)?.clone();
            let value = current.property(name)?;

            let Some(remainder) = remainder else {
                return Some(ResolvedProperty::new(property, value));
            };

            if property.property_type == PropertyType::Map {
                return resolve_dictionary(property, value, remainder);
            }

            match value {
                PropertyValue::Record(record) => {
                    current = record;
                    expression = remainder;
                }
                _ => return None,
            }
        }
    }

    /// Whether the path ends inside a map that holds the key
    pub fn contains_dictionary_key(&self, item: Option<&dyn Record>, expression: &str) -> bool {
        self.resolve(item, expression)
            .is_some_and(|resolved| resolved.contains_dictionary_key())
    }
}

fn resolve_dictionary<'a>(
    property: PropertyInfo,
    value: PropertyValue<'a>,
    key: &str,
) -> Option<ResolvedProperty<'a>> {
    let PropertyValue::Map(map) = value else {
        return None;
    };

    let (value, key_present) = match map.get_value(key) {
        Some(json) => (PropertyValue::Value(Value::from_json(json)), true),
        None => (PropertyValue::Null, false),
    };

    Some(ResolvedProperty {
        property,
        value,
        dictionary_key: Some(key.to_string()),
        key_present,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct City {
        name: String,
        zip: Option<String>,
    }

    crate::impl_record!(City {
        "Name" => name,
        "Zip" => zip,
    });

    #[derive(Serialize)]
    struct Person {
        name: String,
        city: Option<City>,
        attributes: BTreeMap<String, serde_json::Value>,
    }

    crate::impl_record!(Person {
        "Name" => name,
        "City" => city,
        "Attributes" => attributes,
    });

    fn person() -> Person {
        let mut attributes = BTreeMap::new();
        attributes.insert("cost.center".to_string(), json!("CC-7"));
        attributes.insert("badge".to_string(), serde_json::Value::Null);
        Person {
            name: "Ada".into(),
            city: Some(City {
                name: "Zurich".into(),
                zip: None,
            }),
            attributes,
        }
    }

    #[test]
    fn test_nested_path() {
        let person = person();
        let resolver = PropertyResolver::new();
        let resolved = resolver.resolve(Some(&person), "City.Name").unwrap();
        assert_eq!(resolved.name(), "Name");
        assert!(matches!(resolved.value, PropertyValue::Value(Value::String(ref s)) if s == "Zurich"));
    }

    #[test]
    fn test_terminal_null_resolves() {
        let person = person();
        let resolved = PropertyResolver::new().resolve(Some(&person), "City.Zip").unwrap();
        assert!(resolved.value.is_null());
        assert!(!resolved.property.property_type.is_serialized());
    }

    #[test]
    fn test_unresolvable_paths() {
        let person = person();
        let resolver = PropertyResolver::new();
        assert!(resolver.resolve(None, "Name").is_none());
        assert!(resolver.resolve(Some(&person), "  ").is_none());
        assert!(resolver.resolve(Some(&person), "name").is_none());
        assert!(resolver.resolve(Some(&person), "Name.Length").is_none());
        assert!(resolver.resolve(Some(&person), ".Name").is_none());

        let homeless = Person {
            city: None,
            ..person
        };
        assert!(resolver.resolve(Some(&homeless), "City.Name").is_none());
    }

    #[test]
    fn test_dictionary_remainder_is_one_key() {
        let person = person();
        let resolver = PropertyResolver::new();
        let resolved = resolver.resolve(Some(&person), "Attributes.cost.center").unwrap();
        assert_eq!(resolved.name(), "cost.center");
        assert!(matches!(resolved.value, PropertyValue::Value(Value::String(ref s)) if s == "CC-7"));
    }

    #[test]
    fn test_absent_and_null_keys_are_distinguishable() {
        let person = person();
        let resolver = PropertyResolver::new();

        let absent = resolver.resolve(Some(&person), "Attributes.missing").unwrap();
        assert!(absent.value.is_null());
        assert_eq!(absent.dictionary_key.as_deref(), Some("missing"));
        assert!(!absent.contains_dictionary_key());

        let null = resolver.resolve(Some(&person), "Attributes.badge").unwrap();
        assert!(null.value.is_null());
        assert!(null.contains_dictionary_key());
        assert!(resolver.contains_dictionary_key(Some(&person), "Attributes.badge"));
    }
}
