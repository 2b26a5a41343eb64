//! Canonical value type identifiers
//!
//! Columns and parameters carry their type as a plain identifier string so the
//! tabular form stays self-describing. [`ValueType`] is the resolved form of
//! such an identifier.

use std::fmt;

use super::enumeration::EnumDescriptor;
use super::registry::TypeRegistry;

const ENUM_PREFIX: &str = "enum:";
const JSON_TYPE: &str = "json";
const JSON_PREFIX: &str = "json:";
const NULLABLE_SUFFIX: char = '?';

/// Resolved value type of a column, property or parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    String,
    Char,
    Boolean,
    Byte,
    SByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    DateTime,
    Date,
    Uuid,
    /// Registered enumeration
    Enum(&'static EnumDescriptor),
    /// Structured value, optionally naming the originating type
    Json(Option<String>),
}

impl ValueType {
    /// Resolve a type identifier, unwrapping a nullable `?` suffix.
    ///
    /// Returns `None` for unknown identifiers and for enumerations that were
    /// never registered.
    pub fn parse(identifier: &str) -> Option<ValueType> {
        let identifier = identifier.trim();
        let identifier = identifier
            .strip_suffix(NULLABLE_SUFFIX)
            .unwrap_or(identifier);

        let value_type = match identifier {
            "string" => ValueType::String,
            "char" => ValueType::Char,
            "bool" => ValueType::Boolean,
            "u8" => ValueType::Byte,
            "i8" => ValueType::SByte,
            "i16" => ValueType::Int16,
            "u16" => ValueType::UInt16,
            "i32" => ValueType::Int32,
            "u32" => ValueType::UInt32,
            "i64" => ValueType::Int64,
            "u64" => ValueType::UInt64,
            "f32" => ValueType::Single,
            "f64" => ValueType::Double,
            "decimal" => ValueType::Decimal,
            "datetime" => ValueType::DateTime,
            "date" => ValueType::Date,
            "uuid" => ValueType::Uuid,
            JSON_TYPE => ValueType::Json(None),
            other => {
                if let Some(name) = other.strip_prefix(ENUM_PREFIX) {
                    return TypeRegistry::global().enumeration(name).map(ValueType::Enum);
                }
                if let Some(name) = other.strip_prefix(JSON_PREFIX)
                    && !name.is_empty()
                {
                    return Some(ValueType::Json(Some(name.to_string())));
                }
                return None;
            }
        };
        Some(value_type)
    }

    /// The canonical identifier of this type
    pub fn identifier(&self) -> String {
        self.to_string()
    }

    /// String and temporal types are stored unescaped in cells
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            ValueType::String | ValueType::DateTime | ValueType::Date
        )
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, ValueType::Enum(_))
    }

    /// Structured types are carried as JSON text in string columns
    pub fn is_structured(&self) -> bool {
        matches!(self, ValueType::Json(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ValueType::Byte
                | ValueType::SByte
                | ValueType::Int16
                | ValueType::UInt16
                | ValueType::Int32
                | ValueType::UInt32
                | ValueType::Int64
                | ValueType::UInt64
        )
    }

    /// Make an enumeration resolvable by its identifier
    pub fn register(&self) {
        if let ValueType::Enum(descriptor) = self {
            TypeRegistry::global().register_enum(descriptor);
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Char => "char",
            ValueType::Boolean => "bool",
            ValueType::Byte => "u8",
            ValueType::SByte => "i8",
            ValueType::Int16 => "i16",
            ValueType::UInt16 => "u16",
            ValueType::Int32 => "i32",
            ValueType::UInt32 => "u32",
            ValueType::Int64 => "i64",
            ValueType::UInt64 => "u64",
            ValueType::Single => "f32",
            ValueType::Double => "f64",
            ValueType::Decimal => "decimal",
            ValueType::DateTime => "datetime",
            ValueType::Date => "date",
            ValueType::Uuid => "uuid",
            ValueType::Enum(descriptor) => {
                return write!(f, "{}{}", ENUM_PREFIX, descriptor.name);
            }
            ValueType::Json(None) => JSON_TYPE,
            ValueType::Json(Some(name)) => return write!(f, "{}{}", JSON_PREFIX, name),
        };
        f.write_str(name)
    }
}

/// A value type together with its nullable flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub value_type: ValueType,
    pub nullable: bool,
}

impl TypeDescriptor {
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            nullable: false,
        }
    }

    pub fn nullable(value_type: ValueType) -> Self {
        Self {
            value_type,
            nullable: true,
        }
    }

    /// Parse an identifier such as `i32?`
    pub fn parse(identifier: &str) -> Option<TypeDescriptor> {
        let nullable = identifier.trim().ends_with(NULLABLE_SUFFIX);
        ValueType::parse(identifier).map(|value_type| TypeDescriptor {
            value_type,
            nullable,
        })
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}{}", self.value_type, NULLABLE_SUFFIX)
        } else {
            write!(f, "{}", self.value_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_identifiers_round_trip() {
        let types = [
            ValueType::String,
            ValueType::Char,
            ValueType::Boolean,
            ValueType::Byte,
            ValueType::SByte,
            ValueType::Int16,
            ValueType::UInt16,
            ValueType::Int32,
            ValueType::UInt32,
            ValueType::Int64,
            ValueType::UInt64,
            ValueType::Single,
            ValueType::Double,
            ValueType::Decimal,
            ValueType::DateTime,
            ValueType::Date,
            ValueType::Uuid,
            ValueType::Json(None),
            ValueType::Json(Some("Address".to_string())),
        ];
        for value_type in types {
            assert_eq!(ValueType::parse(&value_type.identifier()), Some(value_type));
        }
    }

    #[test]
    fn test_nullable_suffix_is_unwrapped() {
        assert_eq!(ValueType::parse("i32?"), Some(ValueType::Int32));
        let descriptor = TypeDescriptor::parse("datetime?").unwrap();
        assert!(descriptor.nullable);
        assert_eq!(descriptor.value_type, ValueType::DateTime);
        assert_eq!(descriptor.to_string(), "datetime?");
    }

    #[test]
    fn test_unknown_identifiers() {
        assert_eq!(ValueType::parse("System.Int32"), None);
        assert_eq!(ValueType::parse("enum:NeverRegistered"), None);
        assert_eq!(ValueType::parse("json:"), None);
    }
}
