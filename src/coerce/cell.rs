//! Cell encoding
//!
//! A cell is the string form of one value. Strings and temporal values are
//! stored as plain text, enumerations by member name, decimals as plain
//! number text and everything else as JSON. The empty string is the null
//! cell for every type.

use std::str::FromStr;

use chrono::SecondsFormat;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::coerce_value;
use super::error::CoercionError;
use super::parameter::{parse_date, parse_datetime};
use crate::value::{DATE_FORMAT, EnumDescriptor, EnumValue, Value, ValueType};

/// Encode a value into cell text.
///
/// `value_type` is the column's value type, `base_type` its base type when
/// the column carries an enumeration. A column with no known type stores the
/// value's plain text.
pub fn encode_cell(
    value: &Value,
    value_type: Option<&ValueType>,
    base_type: Option<&ValueType>,
) -> Result<String, CoercionError> {
    if value.is_null() {
        return Ok(String::new());
    }

    if let Some(ValueType::Enum(descriptor)) = base_type {
        return encode_enum(value, descriptor);
    }

    let Some(value_type) = value_type else {
        return Ok(value.to_text());
    };

    if let ValueType::Enum(descriptor) = value_type {
        let name = encode_enum(value, descriptor)?;
        return Ok(JsonValue::String(name).to_string());
    }

    let value = coerce_value(value, value_type)?;
    let text = match &value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Json(json) => json.to_string(),
        other => other.to_json().to_string(),
    };
    Ok(text)
}

/// Decode cell text into a value of the column's type.
///
/// Text in a column with no known type is kept as a string.
pub fn decode_cell(
    text: &str,
    value_type: Option<&ValueType>,
    base_type: Option<&ValueType>,
) -> Result<Value, CoercionError> {
    if text.is_empty() {
        return Ok(Value::Null);
    }

    if let Some(ValueType::Enum(descriptor)) = base_type {
        return decode_enum(text, descriptor);
    }

    match value_type {
        Some(value_type) => decode_typed(text, value_type),
        None => Ok(Value::String(text.to_string())),
    }
}

pub(super) fn decode_typed(text: &str, value_type: &ValueType) -> Result<Value, CoercionError> {
    if value_type.is_text() {
        let text = unescape(text);
        return match value_type {
            ValueType::DateTime => parse_datetime(&text)
                .map(Value::DateTime)
                .ok_or_else(|| invalid(value_type, &text)),
            ValueType::Date => parse_date(&text)
                .map(Value::Date)
                .ok_or_else(|| invalid(value_type, &text)),
            _ => Ok(Value::String(text)),
        };
    }

    if let ValueType::Enum(descriptor) = value_type {
        return decode_enum(text, descriptor);
    }

    let json: JsonValue = match serde_json::from_str(text) {
        Ok(json) => json,
        Err(err) => return decode_bare(text, value_type, err),
    };
    if json.is_null() {
        return Ok(Value::Null);
    }

    let value = match value_type {
        ValueType::Boolean => json.as_bool().map(Value::Boolean),
        ValueType::Byte => json_integer(&json).and_then(|v| u8::try_from(v).ok()).map(Value::Byte),
        ValueType::SByte => json_integer(&json).and_then(|v| i8::try_from(v).ok()).map(Value::SByte),
        ValueType::Int16 => json_integer(&json).and_then(|v| i16::try_from(v).ok()).map(Value::Int16),
        ValueType::UInt16 => json_integer(&json).and_then(|v| u16::try_from(v).ok()).map(Value::UInt16),
        ValueType::Int32 => json_integer(&json).and_then(|v| i32::try_from(v).ok()).map(Value::Int32),
        ValueType::UInt32 => json_integer(&json).and_then(|v| u32::try_from(v).ok()).map(Value::UInt32),
        ValueType::Int64 => json_integer(&json).and_then(|v| i64::try_from(v).ok()).map(Value::Int64),
        ValueType::UInt64 => json_integer(&json).and_then(|v| u64::try_from(v).ok()).map(Value::UInt64),
        ValueType::Single => json.as_f64().map(|v| Value::Single(v as f32)),
        ValueType::Double => json.as_f64().map(Value::Double),
        ValueType::Decimal => {
            let decimal = match &json {
                JsonValue::Number(_) => parse_decimal(text.trim()),
                JsonValue::String(s) => parse_decimal(s.trim()),
                _ => None,
            };
            decimal.map(Value::Decimal)
        }
        ValueType::Char => json.as_str().and_then(single_char).map(Value::Char),
        ValueType::Uuid => json
            .as_str()
            .and_then(|s| Uuid::from_str(s).ok())
            .map(Value::Uuid),
        ValueType::Json(_) => Some(Value::Json(json)),
        ValueType::String | ValueType::DateTime | ValueType::Date | ValueType::Enum(_) => None,
    };

    value.ok_or_else(|| invalid(value_type, text))
}

/// Unquoted text for types whose JSON form is a string
fn decode_bare(
    text: &str,
    value_type: &ValueType,
    err: serde_json::Error,
) -> Result<Value, CoercionError> {
    let value = match value_type {
        ValueType::Uuid => Uuid::from_str(text.trim()).ok().map(Value::Uuid),
        ValueType::Char => single_char(text).map(Value::Char),
        _ => None,
    };
    value.ok_or_else(|| CoercionError::MalformedJson {
        value_type: value_type.identifier(),
        text: text.to_string(),
        message: err.to_string(),
    })
}

fn encode_enum(value: &Value, descriptor: &'static EnumDescriptor) -> Result<String, CoercionError> {
    let unknown = |member: String| CoercionError::UnknownEnumMember {
        enumeration: descriptor.name.to_string(),
        member,
    };

    match value {
        Value::String(name) => descriptor
            .ordinal_of(name)
            .map(|_| name.clone())
            .ok_or_else(|| unknown(name.clone())),
        Value::Enum(member) if member.descriptor().name == descriptor.name => member
            .name()
            .map(str::to_string)
            .ok_or_else(|| unknown(member.ordinal().to_string())),
        other => match other.as_i64() {
            Some(ordinal) => descriptor
                .name_of(ordinal)
                .map(str::to_string)
                .ok_or_else(|| unknown(ordinal.to_string())),
            None => Err(CoercionError::Unsupported {
                from: other
                    .value_type()
                    .map(|t| t.identifier())
                    .unwrap_or_default(),
                to: ValueType::Enum(descriptor).identifier(),
            }),
        },
    }
}

fn decode_enum(text: &str, descriptor: &'static EnumDescriptor) -> Result<Value, CoercionError> {
    let member = unescape(text);
    let ordinal = descriptor.ordinal_of(&member).or_else(|| {
        member
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|ordinal| descriptor.contains_ordinal(*ordinal))
    });

    match ordinal {
        Some(ordinal) => Ok(Value::Enum(EnumValue::new(descriptor, ordinal))),
        None => Err(CoercionError::UnknownEnumMember {
            enumeration: descriptor.name.to_string(),
            member,
        }),
    }
}

/// Strip one enclosing pair of quotes and resolve the escapes inside them
fn unescape(text: &str) -> String {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return serde_json::from_str::<String>(text)
            .unwrap_or_else(|_| text[1..text.len() - 1].to_string());
    }
    text.to_string()
}

fn json_integer(json: &JsonValue) -> Option<i128> {
    json.as_i64()
        .map(i128::from)
        .or_else(|| json.as_u64().map(i128::from))
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn invalid(value_type: &ValueType, text: &str) -> CoercionError {
    CoercionError::InvalidValue {
        value_type: value_type.identifier(),
        text: text.to_string(),
    }
}
