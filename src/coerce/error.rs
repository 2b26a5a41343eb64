//! Coercion errors

use thiserror::Error;

/// Failure converting between text and typed values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Text could not be read as JSON of the declared type
    #[error("Malformed {value_type} value '{text}': {message}")]
    MalformedJson {
        value_type: String,
        text: String,
        message: String,
    },

    #[error("Value '{text}' is not a valid {value_type}")]
    InvalidValue { value_type: String, text: String },

    #[error("Unknown {enumeration} member '{member}'")]
    UnknownEnumMember { enumeration: String, member: String },

    #[error("Unknown value type '{0}'")]
    UnknownType(String),

    #[error("Cannot convert {from} to {to}")]
    Unsupported { from: String, to: String },
}
