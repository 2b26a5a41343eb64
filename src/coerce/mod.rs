//! Type coercion
//!
//! Three conversions live here:
//!
//! - [`encode_cell`] / [`decode_cell`]: the loss-free string encoding of a
//!   typed value inside a tabular cell
//! - [`parse_parameter`]: the tolerant parsing of caller supplied parameter
//!   text
//! - [`coerce_value`]: conversion of an in-memory value to another column type

mod cell;
mod error;
mod parameter;

pub use cell::{decode_cell, encode_cell};
pub use error::CoercionError;
pub use parameter::{parse_datetime, parse_parameter};

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use uuid::Uuid;

use crate::value::{EnumValue, Value, ValueType};

/// Convert a value to the given type.
///
/// Numbers convert between numeric types when the target can hold them,
/// strings are parsed, and every value converts to `string` (its text) and to
/// `json`. `Null` stays `Null`.
pub fn coerce_value(value: &Value, target: &ValueType) -> Result<Value, CoercionError> {
    if value.conforms_to(target) {
        return Ok(value.clone());
    }

    let unsupported = || CoercionError::Unsupported {
        from: value
            .value_type()
            .map(|t| t.identifier())
            .unwrap_or_else(|| "null".to_string()),
        to: target.identifier(),
    };

    if let Value::String(text) = value
        && !matches!(target, ValueType::Json(_))
    {
        return match cell::decode_typed(text, target)? {
            Value::Null => Err(unsupported()),
            parsed => Ok(parsed),
        };
    }

    let coerced = match target {
        ValueType::String => Some(Value::String(value.to_text())),
        ValueType::Json(_) => Some(Value::Json(value.to_json())),
        ValueType::Byte => value.as_i64().and_then(|v| u8::try_from(v).ok()).map(Value::Byte),
        ValueType::SByte => value.as_i64().and_then(|v| i8::try_from(v).ok()).map(Value::SByte),
        ValueType::Int16 => value.as_i64().and_then(|v| i16::try_from(v).ok()).map(Value::Int16),
        ValueType::UInt16 => value.as_i64().and_then(|v| u16::try_from(v).ok()).map(Value::UInt16),
        ValueType::Int32 => value.as_i64().and_then(|v| i32::try_from(v).ok()).map(Value::Int32),
        ValueType::UInt32 => value.as_i64().and_then(|v| u32::try_from(v).ok()).map(Value::UInt32),
        ValueType::Int64 => value.as_i64().map(Value::Int64),
        ValueType::UInt64 => match value {
            Value::UInt64(v) => Some(Value::UInt64(*v)),
            other => other.as_i64().and_then(|v| u64::try_from(v).ok()).map(Value::UInt64),
        },
        ValueType::Single => value.as_f64().map(|v| Value::Single(v as f32)),
        ValueType::Double => value.as_f64().map(Value::Double),
        ValueType::Decimal => match value {
            Value::Single(v) => Decimal::from_f32(*v).map(Value::Decimal),
            Value::Double(v) => Decimal::from_f64(*v).map(Value::Decimal),
            Value::UInt64(v) => Some(Value::Decimal(Decimal::from(*v))),
            other => other.as_i64().map(|v| Value::Decimal(Decimal::from(v))),
        },
        ValueType::Enum(descriptor) => value
            .as_i64()
            .filter(|ordinal| descriptor.contains_ordinal(*ordinal))
            .map(|ordinal| Value::Enum(EnumValue::new(descriptor, ordinal))),
        ValueType::DateTime => match value {
            Value::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| Value::DateTime(dt.and_utc())),
            _ => None,
        },
        ValueType::Date => match value {
            Value::DateTime(dt) => Some(Value::Date(dt.date_naive())),
            _ => None,
        },
        ValueType::Uuid => match value {
            Value::Json(serde_json::Value::String(s)) => Uuid::from_str(s).ok().map(Value::Uuid),
            _ => None,
        },
        ValueType::Char | ValueType::Boolean => None,
    };

    coerced.ok_or_else(unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_widening_and_narrowing() {
        assert_eq!(coerce_value(&Value::Int32(5), &ValueType::Int64).unwrap(), Value::Int64(5));
        assert_eq!(
            coerce_value(&Value::Int64(5), &ValueType::Decimal).unwrap(),
            Value::Decimal(Decimal::from(5))
        );
        assert!(coerce_value(&Value::Int64(70000), &ValueType::Int16).is_err());
    }

    #[test]
    fn test_string_targets_and_sources() {
        assert_eq!(
            coerce_value(&Value::Int32(12), &ValueType::String).unwrap(),
            Value::String("12".to_string())
        );
        assert_eq!(
            coerce_value(&Value::String("12".into()), &ValueType::Int32).unwrap(),
            Value::Int32(12)
        );
        assert!(coerce_value(&Value::String("twelve".into()), &ValueType::Int32).is_err());
    }

    #[test]
    fn test_null_is_preserved() {
        assert_eq!(coerce_value(&Value::Null, &ValueType::Uuid).unwrap(), Value::Null);
    }
}
