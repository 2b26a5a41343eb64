//! Record reflection
//!
//! Items returned by operations are exposed as [`Record`]s: types that list
//! their properties and hand out property values by name. The
//! [`impl_record!`](crate::impl_record) macro derives both from a struct's
//! fields, and [`Field`] maps each field type onto a [`PropertyType`].

pub mod cache;
pub mod resolver;

pub use cache::PropertyCache;
pub use resolver::{PropertyResolver, ResolvedProperty};

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
pub use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::value::{Value, ValueType};

/// Shape of a property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    /// Scalar or structured value of a known type
    Value(ValueType),
    /// Nested record, by type name
    Object(&'static str),
    /// String keyed map
    Map,
}

impl PropertyType {
    /// Nested records, maps and structured values are carried as JSON text
    pub fn is_serialized(&self) -> bool {
        match self {
            PropertyType::Value(value_type) => value_type.is_structured(),
            PropertyType::Object(_) | PropertyType::Map => true,
        }
    }

    /// Column type used when the property is projected into a table
    pub fn column_type(&self) -> ValueType {
        match self {
            PropertyType::Value(value_type) if !value_type.is_structured() => value_type.clone(),
            _ => ValueType::String,
        }
    }
}

/// Declared property of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub property_type: PropertyType,
    pub nullable: bool,
}

impl PropertyInfo {
    pub fn new(name: &'static str, property_type: PropertyType, nullable: bool) -> Self {
        Self {
            name,
            property_type,
            nullable,
        }
    }

    /// Describe a field by its Rust type
    pub fn of_field<T: Field>(name: &'static str, _field: &T) -> Self {
        Self::new(name, T::property_type(), T::nullable())
    }
}

/// Read access to a string keyed map property
pub trait StringMap: Send + Sync {
    fn get_value(&self, key: &str) -> Option<&JsonValue>;

    fn contains_key(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    fn to_json(&self) -> JsonValue;
}

impl StringMap for HashMap<String, JsonValue> {
    fn get_value(&self, key: &str) -> Option<&JsonValue> {
        self.get(key)
    }

    fn to_json(&self) -> JsonValue {
        to_json_value(self)
    }
}

impl StringMap for BTreeMap<String, JsonValue> {
    fn get_value(&self, key: &str) -> Option<&JsonValue> {
        self.get(key)
    }

    fn to_json(&self) -> JsonValue {
        to_json_value(self)
    }
}

impl StringMap for serde_json::Map<String, JsonValue> {
    fn get_value(&self, key: &str) -> Option<&JsonValue> {
        self.get(key)
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.clone())
    }
}

/// Value of a property at runtime
pub enum PropertyValue<'a> {
    Null,
    Value(Value),
    Record(&'a dyn Record),
    Map(&'a dyn StringMap),
    Json(JsonValue),
}

impl PropertyValue<'_> {
    pub fn is_null(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::Value(value) => value.is_null(),
            PropertyValue::Json(json) => json.is_null(),
            PropertyValue::Record(_) | PropertyValue::Map(_) => false,
        }
    }

    /// JSON form of the value
    pub fn to_json(&self) -> JsonValue {
        match self {
            PropertyValue::Null => JsonValue::Null,
            PropertyValue::Value(value) => value.to_json(),
            PropertyValue::Record(record) => record.to_json(),
            PropertyValue::Map(map) => map.to_json(),
            PropertyValue::Json(json) => json.clone(),
        }
    }
}

impl std::fmt::Debug for PropertyValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("Null"),
            PropertyValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            PropertyValue::Record(record) => f.debug_tuple("Record").field(&record.type_name()).finish(),
            PropertyValue::Map(map) => f.debug_tuple("Map").field(&map.to_json()).finish(),
            PropertyValue::Json(json) => f.debug_tuple("Json").field(json).finish(),
        }
    }
}

/// An item whose properties can be enumerated and read by name
pub trait Record: Send + Sync + 'static {
    /// Type name, used as default table name
    fn type_name(&self) -> &'static str;

    /// Properties in declaration order
    fn properties(&self) -> Vec<PropertyInfo>;

    /// Value of a property; names are case-sensitive
    fn property(&self, name: &str) -> Option<PropertyValue<'_>>;

    fn to_json(&self) -> JsonValue;

    /// Identity of the concrete type, used to cache property lists
    fn record_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// Field types usable as record properties
pub trait Field {
    fn property_type() -> PropertyType;

    fn nullable() -> bool {
        false
    }

    fn property_value(&self) -> PropertyValue<'_>;
}

macro_rules! scalar_field {
    ($($ty:ty => $value_type:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn property_type() -> PropertyType {
                    PropertyType::Value(ValueType::$value_type)
                }

                fn property_value(&self) -> PropertyValue<'_> {
                    PropertyValue::Value(Value::from(self.clone()))
                }
            }
        )*
    };
}

scalar_field!(
    String => String,
    char => Char,
    bool => Boolean,
    u8 => Byte,
    i8 => SByte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Single,
    f64 => Double,
    Decimal => Decimal,
    DateTime<Utc> => DateTime,
    NaiveDate => Date,
    Uuid => Uuid,
);

impl<T: Field> Field for Option<T> {
    fn property_type() -> PropertyType {
        T::property_type()
    }

    fn nullable() -> bool {
        true
    }

    fn property_value(&self) -> PropertyValue<'_> {
        match self {
            Some(value) => value.property_value(),
            None => PropertyValue::Null,
        }
    }
}

impl<T: Serialize> Field for Vec<T> {
    fn property_type() -> PropertyType {
        PropertyType::Value(ValueType::Json(None))
    }

    fn property_value(&self) -> PropertyValue<'_> {
        PropertyValue::Json(to_json_value(self))
    }
}

impl Field for JsonValue {
    fn property_type() -> PropertyType {
        PropertyType::Value(ValueType::Json(None))
    }

    fn nullable() -> bool {
        true
    }

    fn property_value(&self) -> PropertyValue<'_> {
        PropertyValue::Json(self.clone())
    }
}

macro_rules! map_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn property_type() -> PropertyType {
                    PropertyType::Map
                }

                fn property_value(&self) -> PropertyValue<'_> {
                    PropertyValue::Map(self)
                }
            }
        )*
    };
}

map_field!(
    HashMap<String, JsonValue>,
    BTreeMap<String, JsonValue>,
    serde_json::Map<String, JsonValue>,
);

/// Serialize to JSON, `null` on failure
pub fn to_json_value<T: Serialize + ?Sized>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or_default()
}

/// Implement [`Record`] and [`Field`] for a serializable struct.
///
/// ```
/// use api_reporting_sdk::impl_record;
/// use api_reporting_sdk::reflect::Record;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Tenant {
///     id: String,
///     name: Option<String>,
/// }
///
/// impl_record!(Tenant {
///     "Id" => id,
///     "Name" => name,
/// });
///
/// let tenant = Tenant { id: "T1".into(), name: None };
/// assert_eq!(tenant.properties().len(), 2);
/// assert!(tenant.property("Name").is_some_and(|v| v.is_null()));
/// ```
#[macro_export]
macro_rules! impl_record {
    ($type:ident { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::reflect::Record for $type {
            fn type_name(&self) -> &'static str {
                stringify!($type)
            }

            fn properties(&self) -> ::std::vec::Vec<$crate::reflect::PropertyInfo> {
                ::std::vec![$($crate::reflect::PropertyInfo::of_field($name, &self.$field)),*]
            }

            fn property(&self, name: &str) -> ::std::option::Option<$crate::reflect::PropertyValue<'_>> {
                match name {
                    $($name => ::std::option::Option::Some($crate::reflect::Field::property_value(&self.$field)),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn to_json(&self) -> $crate::reflect::JsonValue {
                $crate::reflect::to_json_value(self)
            }
        }

        impl $crate::reflect::Field for $type {
            fn property_type() -> $crate::reflect::PropertyType {
                $crate::reflect::PropertyType::Object(stringify!($type))
            }

            fn property_value(&self) -> $crate::reflect::PropertyValue<'_> {
                $crate::reflect::PropertyValue::Record(self)
            }
        }
    };
}
