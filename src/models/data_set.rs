//! Data set model

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::TableError;
use super::relation::DataRelation;
use super::table::DataTable;
use crate::relational::RelationalDataSet;

/// Named collection of tables and the relations between them
///
/// # Example
///
/// ```rust
/// use api_reporting_sdk::models::{DataColumn, DataSet, DataTable};
/// use api_reporting_sdk::value::{Value, ValueType};
///
/// let mut table = DataTable::new("Tenants")
///     .with_columns(vec![DataColumn::new("Id", &ValueType::String)]);
/// table.add_row(&[Value::from("T1")]).unwrap();
///
/// let data_set = DataSet::new("Report").with_table(table);
/// assert!(data_set.has_data());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<DataTable>,
    #[serde(default)]
    pub relations: Vec<DataRelation>,
}

impl DataSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: DataTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_relation(mut self, relation: DataRelation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Table by name, ignoring case
    pub fn table(&self, name: &str) -> Option<&DataTable> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .or_else(|| self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
    }

    /// Remove a table by name, returning it
    pub fn remove_table(&mut self, name: &str) -> Option<DataTable> {
        let index = self
            .tables
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))?;
        Some(self.tables.remove(index))
    }

    /// Whether any table holds at least one row
    pub fn has_data(&self) -> bool {
        self.tables.iter().any(|t| !t.rows.is_empty())
    }

    /// Convert into the relational form.
    ///
    /// Fails when a row does not match its table's shape, a cell cannot be
    /// decoded, or a relation refers to a missing table or column.
    pub fn to_relational(&self) -> Result<RelationalDataSet, TableError> {
        let mut data_set = RelationalDataSet::new(self.name.clone());
        for table in &self.tables {
            data_set.add_table(table.to_relational()?);
        }

        for relation in &self.relations {
            data_set.add_relation(
                &relation.name,
                &relation.parent_table,
                &relation.parent_column,
                &relation.child_table,
                &relation.child_column,
            )?;
        }

        debug!(
            data_set = %self.name,
            tables = data_set.tables.len(),
            relations = data_set.relations.len(),
            "Converted data set to relational form"
        );
        Ok(data_set)
    }

    /// Capture a relational data set; relations keep their first column pair
    pub fn from_relational(source: &RelationalDataSet) -> Result<DataSet, TableError> {
        let mut data_set = DataSet::new(source.name.clone());
        for table in &source.tables {
            data_set.tables.push(DataTable::from_relational(table)?);
        }

        for relation in &source.relations {
            let (Some(parent_column), Some(child_column)) =
                (relation.parent_columns.first(), relation.child_columns.first())
            else {
                debug!(relation = %relation.name, "Skipping relation without columns");
                continue;
            };
            data_set.relations.push(DataRelation::new(
                relation.name.clone(),
                relation.parent_table.clone(),
                parent_column.clone(),
                relation.child_table.clone(),
                child_column.clone(),
            ));
        }
        Ok(data_set)
    }
}
