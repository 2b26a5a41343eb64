//! Column model

use serde::{Deserialize, Serialize};

use crate::relational::RelationalColumn;
use crate::value::ValueType;

/// Column of a [`DataTable`](super::DataTable)
///
/// The value type is a canonical type identifier. Enumeration columns are
/// normalized to a `string` value type with the enumeration recorded as the
/// base type, so cells can carry the member name.
///
/// # Example
///
/// ```rust
/// use api_reporting_sdk::models::DataColumn;
/// use api_reporting_sdk::value::ValueType;
///
/// let column = DataColumn::new("Salary", &ValueType::Decimal);
/// assert_eq!(column.value_type.as_deref(), Some("decimal"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataColumn {
    pub name: String,
    /// Expression of a derived column; derived columns store no values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default)]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_base_type: Option<String>,
}

impl DataColumn {
    pub fn new(name: impl Into<String>, value_type: &ValueType) -> Self {
        value_type.register();
        let (value_type, value_base_type) = match value_type {
            ValueType::Enum(_) => (ValueType::String.identifier(), Some(value_type.identifier())),
            other => (other.identifier(), None),
        };
        Self {
            name: name.into(),
            expression: None,
            value_type: Some(value_type),
            value_base_type,
        }
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn is_derived(&self) -> bool {
        self.expression
            .as_deref()
            .is_some_and(|expression| !expression.trim().is_empty())
    }

    /// Resolved value type, `None` when missing or unknown
    pub fn resolved_value_type(&self) -> Option<ValueType> {
        self.value_type.as_deref().and_then(ValueType::parse)
    }

    /// Resolved base type, `None` when missing or unknown
    pub fn resolved_base_type(&self) -> Option<ValueType> {
        self.value_base_type.as_deref().and_then(ValueType::parse)
    }

    /// Type of the corresponding relational column: the enumeration base type
    /// when present, otherwise the value type, falling back to `string`
    pub fn relational_type(&self) -> ValueType {
        match self.resolved_base_type() {
            Some(base_type @ ValueType::Enum(_)) => base_type,
            _ => self.resolved_value_type().unwrap_or(ValueType::String),
        }
    }

    pub fn from_relational(column: &RelationalColumn) -> Self {
        let mut data_column = DataColumn::new(column.name.clone(), &column.value_type);
        data_column.expression = column.expression.clone();
        data_column
    }

    pub fn to_relational(&self) -> RelationalColumn {
        let mut column = RelationalColumn::new(self.name.clone(), self.relational_type());
        column.expression = self.expression.clone();
        column
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Enumeration;

    crate::enumeration! {
        enum Tier {
            Basic = 0,
            Premium = 1,
        }
    }

    #[test]
    fn test_enum_columns_are_normalized() {
        let column = DataColumn::new("Tier", &ValueType::Enum(Tier::descriptor()));
        assert_eq!(column.value_type.as_deref(), Some("string"));
        assert_eq!(column.value_base_type.as_deref(), Some("enum:Tier"));
        assert_eq!(column.relational_type(), ValueType::Enum(Tier::descriptor()));
    }

    #[test]
    fn test_unknown_types_fall_back_to_string() {
        let column = DataColumn {
            name: "Legacy".into(),
            expression: None,
            value_type: Some("System.Guid".into()),
            value_base_type: None,
        };
        assert_eq!(column.resolved_value_type(), None);
        assert_eq!(column.relational_type(), ValueType::String);
    }

    #[test]
    fn test_serialized_shape() {
        let column = DataColumn::new("Total", &ValueType::Decimal).with_expression("Price * Quantity");
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Total", "expression": "Price * Quantity", "valueType": "decimal"})
        );
        assert!(column.is_derived());
    }
}
