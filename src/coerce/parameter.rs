//! Tolerant parameter parsing
//!
//! Parameter text comes from query strings and report requests, so scalar
//! parsing is forgiving: unparsable input yields `Null` instead of an error.
//! Only structured (`json`) parameters fail loudly on malformed text.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::CoercionError;
use crate::value::{DATE_FORMAT, EnumValue, Value, ValueType};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[DATE_FORMAT, "%m/%d/%Y"];

/// Parse parameter text into a value of the given type
pub fn parse_parameter(text: &str, value_type: &ValueType) -> Result<Value, CoercionError> {
    let value = match value_type {
        ValueType::String => Some(Value::String(text.to_string())),
        ValueType::Char => text.chars().next().map(Value::Char),
        ValueType::Boolean => parse_bool(text).map(Value::Boolean),
        ValueType::Byte => text.trim().parse().ok().map(Value::Byte),
        ValueType::SByte => text.trim().parse().ok().map(Value::SByte),
        ValueType::Int16 => text.trim().parse().ok().map(Value::Int16),
        ValueType::UInt16 => text.trim().parse().ok().map(Value::UInt16),
        ValueType::Int32 => text.trim().parse().ok().map(Value::Int32),
        ValueType::UInt32 => text.trim().parse().ok().map(Value::UInt32),
        ValueType::Int64 => text.trim().parse().ok().map(Value::Int64),
        ValueType::UInt64 => text.trim().parse().ok().map(Value::UInt64),
        ValueType::Single => text.trim().parse().ok().map(Value::Single),
        ValueType::Double => text.trim().parse().ok().map(Value::Double),
        ValueType::Decimal => {
            let text = text.trim();
            Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .ok()
                .map(Value::Decimal)
        }
        ValueType::DateTime => parse_datetime(text).map(Value::DateTime),
        ValueType::Date => parse_date(text).map(Value::Date),
        ValueType::Uuid => Uuid::from_str(text.trim()).ok().map(Value::Uuid),
        ValueType::Enum(descriptor) => {
            let text = text.trim();
            descriptor
                .ordinal_of(text)
                .or_else(|| {
                    text.parse::<i64>()
                        .ok()
                        .filter(|ordinal| descriptor.contains_ordinal(*ordinal))
                })
                .map(|ordinal| Value::Enum(EnumValue::new(descriptor, ordinal)))
        }
        ValueType::Json(_) => {
            let json: serde_json::Value =
                serde_json::from_str(text).map_err(|err| CoercionError::MalformedJson {
                    value_type: value_type.identifier(),
                    text: text.to_string(),
                    message: err.to_string(),
                })?;
            (!json.is_null()).then_some(Value::Json(json))
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

/// Parse an instant, normalized to UTC.
///
/// Accepts RFC 3339 and common date-time layouts; text without an offset is
/// taken as UTC and a bare date is midnight.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            parse_date(text)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Parse a calendar date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    crate::enumeration! {
        enum Priority {
            Low = 0,
            High = 1,
        }
    }

    use crate::value::Enumeration;

    #[test]
    fn test_unparsable_scalars_are_null() {
        assert_eq!(parse_parameter("abc", &ValueType::Int32).unwrap(), Value::Null);
        assert_eq!(parse_parameter("maybe", &ValueType::Boolean).unwrap(), Value::Null);
        assert_eq!(parse_parameter("1.2.3", &ValueType::Decimal).unwrap(), Value::Null);
        assert_eq!(parse_parameter("not-a-date", &ValueType::DateTime).unwrap(), Value::Null);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_parameter(" 42 ", &ValueType::Int32).unwrap(), Value::Int32(42));
        assert_eq!(parse_parameter("TRUE", &ValueType::Boolean).unwrap(), Value::Boolean(true));
        assert_eq!(parse_parameter("xyz", &ValueType::Char).unwrap(), Value::Char('x'));
        assert_eq!(
            parse_parameter("12.75", &ValueType::Decimal).unwrap(),
            Value::Decimal(Decimal::new(1275, 2))
        );
        assert_eq!(parse_parameter("2.5", &ValueType::Double).unwrap(), Value::Double(2.5));
    }

    #[test]
    fn test_datetime_is_normalized_to_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        assert_eq!(
            parse_parameter("2024-01-15T10:00:00+02:00", &ValueType::DateTime).unwrap(),
            Value::DateTime(expected)
        );
        assert_eq!(
            parse_parameter("2024-01-15 08:00:00", &ValueType::DateTime).unwrap(),
            Value::DateTime(expected)
        );
        assert_eq!(
            parse_datetime("2024-01-15"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_enum_by_name_or_ordinal() {
        let priority = ValueType::Enum(Priority::descriptor());
        assert_eq!(
            parse_parameter("High", &priority).unwrap(),
            Value::from_enum(Priority::High)
        );
        assert_eq!(
            parse_parameter("0", &priority).unwrap(),
            Value::from_enum(Priority::Low)
        );
        assert_eq!(parse_parameter("7", &priority).unwrap(), Value::Null);
    }

    #[test]
    fn test_json_parameters() {
        let value_type = ValueType::Json(Some("Filter".into()));
        assert_eq!(
            parse_parameter("{\"a\":1}", &value_type).unwrap(),
            Value::Json(serde_json::json!({"a": 1}))
        );
        assert_eq!(parse_parameter("null", &value_type).unwrap(), Value::Null);
        assert!(parse_parameter("{broken", &value_type).is_err());
    }
}
