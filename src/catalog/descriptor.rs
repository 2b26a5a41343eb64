//! Operation and parameter descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{TypeDescriptor, Value, ValueType};

/// Declared parameter of an operation
///
/// # Example
///
/// ```rust
/// use api_reporting_sdk::catalog::ParameterDescriptor;
/// use api_reporting_sdk::value::{Value, ValueType};
///
/// let tenant = ParameterDescriptor::required("tenantId", ValueType::String);
/// let limit = ParameterDescriptor::optional("limit", ValueType::Int32, Value::Int32(100));
/// assert!(tenant.required);
/// assert_eq!(limit.default_value.as_deref(), Some("100"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    /// Canonical type identifier, without the nullable suffix
    #[serde(rename = "type")]
    pub value_type: String,
    pub required: bool,
    pub nullable: bool,
    /// Default value as JSON text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ParameterDescriptor {
    fn new(name: impl Into<String>, value_type: &ValueType, required: bool) -> Self {
        value_type.register();
        Self {
            name: name.into(),
            value_type: value_type.identifier(),
            required,
            nullable: false,
            default_value: None,
        }
    }

    /// A parameter callers must supply
    pub fn required(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, &value_type, true)
    }

    /// A parameter with a default; a `Null` default records none
    pub fn optional(name: impl Into<String>, value_type: ValueType, default_value: Value) -> Self {
        let mut parameter = Self::new(name, &value_type, false);
        if !default_value.is_null() {
            parameter.default_value = Some(default_value.to_json().to_string());
        }
        parameter
    }

    /// Mark the parameter as accepting null
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Resolved type, `None` for unknown identifiers
    pub fn type_descriptor(&self) -> Option<TypeDescriptor> {
        ValueType::parse(&self.value_type).map(|value_type| TypeDescriptor {
            value_type,
            nullable: self.nullable,
        })
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default_value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

/// Catalog entry of an operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    pub name: String,
    pub path: String,
    /// Name of the owning handler type
    pub handler: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}
