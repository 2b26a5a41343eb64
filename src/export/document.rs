//! JSON and YAML documents of a data set

use crate::export::{ExportError, ExportFormat, ExportResult};
use crate::models::DataSet;

impl DataSet {
    /// Indented camelCase JSON document
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ExportError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ExportError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Exporter for data set documents.
pub struct DataSetExporter;

impl DataSetExporter {
    /// Export a data set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use api_reporting_sdk::export::{DataSetExporter, ExportFormat};
    /// use api_reporting_sdk::models::DataSet;
    ///
    /// let result = DataSetExporter::export(&DataSet::new("Empty"), ExportFormat::Json).unwrap();
    /// assert!(result.content.contains("\"name\": \"Empty\""));
    /// ```
    pub fn export(data_set: &DataSet, format: ExportFormat) -> Result<ExportResult, ExportError> {
        let content = match format {
            ExportFormat::Json => data_set.to_json()?,
            ExportFormat::Yaml => data_set.to_yaml()?,
        };
        Ok(ExportResult { content, format })
    }

    /// Read a data set document
    pub fn import(content: &str, format: ExportFormat) -> Result<DataSet, ExportError> {
        match format {
            ExportFormat::Json => DataSet::from_json(content),
            ExportFormat::Yaml => DataSet::from_yaml(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataColumn, DataRelation, DataTable};
    use crate::value::{Value, ValueType};

    fn data_set() -> DataSet {
        let mut tenants = DataTable::new("Tenants").with_columns(vec![DataColumn::new("Id", &ValueType::String)]);
        tenants.add_row(&[Value::from("T1")]).unwrap();

        let mut employees = DataTable::new("Employees").with_columns(vec![
            DataColumn::new("Name", &ValueType::String),
            DataColumn::new("TenantId", &ValueType::String),
            DataColumn::new("Salary", &ValueType::Decimal),
        ]);
        employees
            .add_row(&[Value::from("Ada"), Value::from("T1"), Value::Null])
            .unwrap();

        DataSet::new("Staff")
            .with_table(tenants)
            .with_table(employees)
            .with_relation(DataRelation::new("TenantEmployees", "Tenants", "Id", "Employees", "TenantId"))
    }

    #[test]
    fn test_json_document_uses_camel_case() {
        let json = data_set().to_json().unwrap();
        assert!(json.contains("\"valueType\": \"string\""));
        assert!(json.contains("\"parentTable\": \"Tenants\""));
        assert_eq!(DataSet::from_json(&json).unwrap(), data_set());
    }

    #[test]
    fn test_yaml_document() {
        let result = DataSetExporter::export(&data_set(), ExportFormat::Yaml).unwrap();
        assert_eq!(result.format, ExportFormat::Yaml);
        assert!(result.content.contains("childColumn: TenantId"));
        assert_eq!(DataSetExporter::import(&result.content, ExportFormat::Yaml).unwrap(), data_set());
    }

    #[test]
    fn test_invalid_documents_fail() {
        assert!(matches!(DataSet::from_json("{"), Err(ExportError::Json(_))));
        assert!(matches!(DataSet::from_yaml("name: [1"), Err(ExportError::Yaml(_))));
    }
}
