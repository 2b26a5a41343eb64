//! Typed values
//!
//! [`Value`] is the in-memory representation of a single cell, property or
//! parameter value. Every variant maps to exactly one [`ValueType`]; `Null`
//! conforms to every type.

pub mod enumeration;
pub mod registry;
pub mod value_type;

pub use enumeration::{EnumDescriptor, Enumeration};
pub use registry::{TypeRegistry, register_enum};
pub use value_type::{TypeDescriptor, ValueType};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value as JsonValue;
use uuid::Uuid;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// An enumeration member, kept as descriptor plus ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    descriptor: &'static EnumDescriptor,
    ordinal: i64,
}

impl EnumValue {
    pub fn new(descriptor: &'static EnumDescriptor, ordinal: i64) -> Self {
        Self {
            descriptor,
            ordinal,
        }
    }

    pub fn descriptor(&self) -> &'static EnumDescriptor {
        self.descriptor
    }

    pub fn ordinal(&self) -> i64 {
        self.ordinal
    }

    /// Symbolic name, absent for ordinals outside the enumeration
    pub fn name(&self) -> Option<&'static str> {
        self.descriptor.name_of(self.ordinal)
    }
}

/// A single typed value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Char(char),
    Boolean(bool),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
    Enum(EnumValue),
    Json(JsonValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn from_enum<E: Enumeration>(value: E) -> Self {
        Value::Enum(EnumValue::new(E::descriptor(), value.ordinal()))
    }

    /// The type of this value, `None` for `Null`
    pub fn value_type(&self) -> Option<ValueType> {
        let value_type = match self {
            Value::Null => return None,
            Value::String(_) => ValueType::String,
            Value::Char(_) => ValueType::Char,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Byte(_) => ValueType::Byte,
            Value::SByte(_) => ValueType::SByte,
            Value::Int16(_) => ValueType::Int16,
            Value::UInt16(_) => ValueType::UInt16,
            Value::Int32(_) => ValueType::Int32,
            Value::UInt32(_) => ValueType::UInt32,
            Value::Int64(_) => ValueType::Int64,
            Value::UInt64(_) => ValueType::UInt64,
            Value::Single(_) => ValueType::Single,
            Value::Double(_) => ValueType::Double,
            Value::Decimal(_) => ValueType::Decimal,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Date(_) => ValueType::Date,
            Value::Uuid(_) => ValueType::Uuid,
            Value::Enum(value) => ValueType::Enum(value.descriptor),
            Value::Json(_) => ValueType::Json(None),
        };
        Some(value_type)
    }

    /// Whether this value may be stored in a column of the given type
    pub fn conforms_to(&self, value_type: &ValueType) -> bool {
        match (self, value_type) {
            (Value::Null, _) => true,
            (Value::Enum(value), ValueType::Enum(descriptor)) => {
                value.descriptor.name == descriptor.name
            }
            (Value::Json(_), ValueType::Json(_)) => true,
            (value, expected) => value.value_type().as_ref() == Some(expected),
        }
    }

    /// Integer view over any integer or enumeration variant
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::SByte(v) => Some(i64::from(*v)),
            Value::Int16(v) => Some(i64::from(*v)),
            Value::UInt16(v) => Some(i64::from(*v)),
            Value::Int32(v) => Some(i64::from(*v)),
            Value::UInt32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            Value::Enum(v) => Some(v.ordinal),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Single(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            Value::Decimal(v) => v.to_f64(),
            Value::UInt64(v) => Some(*v as f64),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// JSON representation used for serialized cells and payload texts
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Char(c) => JsonValue::String(c.to_string()),
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Byte(v) => JsonValue::from(*v),
            Value::SByte(v) => JsonValue::from(*v),
            Value::Int16(v) => JsonValue::from(*v),
            Value::UInt16(v) => JsonValue::from(*v),
            Value::Int32(v) => JsonValue::from(*v),
            Value::UInt32(v) => JsonValue::from(*v),
            Value::Int64(v) => JsonValue::from(*v),
            Value::UInt64(v) => JsonValue::from(*v),
            Value::Single(v) => serde_json::Number::from_f64(f64::from(*v))
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Double(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Decimal(d) => serde_json::Number::from_str(&d.to_string())
                .map(JsonValue::Number)
                .unwrap_or_else(|_| JsonValue::String(d.to_string())),
            Value::DateTime(dt) => {
                JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Date(d) => JsonValue::String(d.format(DATE_FORMAT).to_string()),
            Value::Uuid(u) => JsonValue::String(u.to_string()),
            Value::Enum(e) => match e.name() {
                Some(name) => JsonValue::String(name.to_string()),
                None => JsonValue::from(e.ordinal),
            },
            Value::Json(json) => json.clone(),
        }
    }

    /// Untyped conversion from JSON: numbers become `Int64`, `UInt64` or
    /// `Double`, arrays and objects stay structured
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Value::Int64(v)
                } else if let Some(v) = n.as_u64() {
                    Value::UInt64(v)
                } else {
                    n.as_f64().map(Value::Double).unwrap_or(Value::Null)
                }
            }
            JsonValue::String(s) => Value::String(s.clone()),
            other => Value::Json(other.clone()),
        }
    }

    /// Text form, strings unquoted and everything else as JSON
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Char(c) => c.to_string(),
            Value::Decimal(d) => d.to_string(),
            other => match other.to_json() {
                JsonValue::String(s) => s,
                json => json.to_string(),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            other => f.write_str(&other.to_text()),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from!(
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
    EnumValue => Enum,
    JsonValue => Json,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Typed extraction from a [`Value`]
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value!(
    String => String,
    char => Char,
    bool => Boolean,
    f32 => Single,
    Decimal => Decimal,
    DateTime<Utc> => DateTime,
    NaiveDate => Date,
    Uuid => Uuid,
    JsonValue => Json,
);

macro_rules! integer_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::UInt64(v) => <$ty>::try_from(*v).ok(),
                        Value::Enum(_) => None,
                        other => other.as_i64().and_then(|v| <$ty>::try_from(v).ok()),
                    }
                }
            }
        )*
    };
}

integer_from_value!(u8, i8, i16, u16, i32, u32, i64, u64);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Enum(_) => None,
            other => other.as_f64(),
        }
    }
}
