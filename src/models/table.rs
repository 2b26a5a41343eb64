//! Table model
//!
//! A [`DataTable`] is self-describing: every column names its value type and
//! every cell is text, so a table survives any text transport and can be
//! decoded without the types that produced it.

use serde::{Deserialize, Serialize};

use super::column::DataColumn;
use super::data_set::DataSet;
use super::error::TableError;
use super::row::DataRow;
use crate::coerce::{decode_cell, encode_cell};
use crate::relational::RelationalTable;
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataTable {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<DataColumn>,
    #[serde(default)]
    pub rows: Vec<DataRow>,
}

/// Column types resolved once per conversion
struct ColumnTypes {
    value_type: Option<ValueType>,
    base_type: Option<ValueType>,
    derived: bool,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_columns(mut self, columns: Vec<DataColumn>) -> Self {
        self.columns = columns;
        self
    }

    /// Column position by name, ignoring case
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.name.eq_ignore_ascii_case(name))
            })
    }

    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.column_index(name).map(|index| &self.columns[index])
    }

    /// Append a column; existing rows get an empty cell
    pub fn add_column(&mut self, column: DataColumn) -> Result<(), TableError> {
        if self.column_index(&column.name).is_some() {
            return Err(TableError::DuplicateColumn {
                table: self.name.clone(),
                column: column.name,
            });
        }
        self.columns.push(column);
        for row in &mut self.rows {
            row.values.push(String::new());
        }
        Ok(())
    }

    /// Encode and append a row of values, one per column.
    ///
    /// Derived columns get an empty cell whatever value is passed for them.
    pub fn add_row(&mut self, values: &[Value]) -> Result<(), TableError> {
        self.check_shape(values.len())?;

        let types = self.column_types();
        let mut cells = Vec::with_capacity(values.len());
        for ((column, types), value) in self.columns.iter().zip(&types).zip(values) {
            if types.derived {
                cells.push(String::new());
                continue;
            }
            let cell = encode_cell(value, types.value_type.as_ref(), types.base_type.as_ref())
                .map_err(|error| TableError::Cell {
                    table: self.name.clone(),
                    column: column.name.clone(),
                    error,
                })?;
            cells.push(cell);
        }

        self.rows.push(DataRow::new(cells));
        Ok(())
    }

    /// Append an already encoded row
    pub fn push_row(&mut self, row: DataRow) -> Result<(), TableError> {
        self.check_shape(row.len())?;
        self.rows.push(row);
        Ok(())
    }

    /// Decode the cells of a row, one value per column.
    ///
    /// Derived columns and empty cells decode to `Null`.
    pub fn raw_values(&self, row: &DataRow) -> Result<Vec<Value>, TableError> {
        self.decode_row(row, &self.column_types())
    }

    /// Decode every row
    pub fn decode_rows(&self) -> Result<Vec<Vec<Value>>, TableError> {
        let types = self.column_types();
        self.rows
            .iter()
            .map(|row| self.decode_row(row, &types))
            .collect()
    }

    /// Decoded value of one cell
    pub fn value(&self, row: usize, column: &str) -> Result<Option<Value>, TableError> {
        let Some(index) = self.column_index(column) else {
            return Err(TableError::UnknownColumn {
                table: self.name.clone(),
                column: column.to_string(),
            });
        };
        let Some(row) = self.rows.get(row) else {
            return Ok(None);
        };
        let column = &self.columns[index];
        let types = column_types(column);
        if types.derived {
            return Ok(Some(Value::Null));
        }
        let text = row.cell(index).unwrap_or_default();
        self.decode(column, &types, text).map(Some)
    }

    pub fn to_relational(&self) -> Result<RelationalTable, TableError> {
        let mut table = RelationalTable::new(self.name.clone());
        for column in &self.columns {
            table.add_column(column.to_relational())?;
        }

        let types = self.column_types();
        for row in &self.rows {
            table.add_row(self.decode_row(row, &types)?)?;
        }
        Ok(table)
    }

    pub fn from_relational(source: &RelationalTable) -> Result<DataTable, TableError> {
        let mut table = DataTable::new(source.name.clone())
            .with_columns(source.columns.iter().map(DataColumn::from_relational).collect());
        for values in &source.rows {
            table.add_row(values)?;
        }
        Ok(table)
    }

    /// Wrap this table in a data set of its own
    pub fn into_data_set(self, name: Option<&str>) -> DataSet {
        let name = name.map(str::to_string).unwrap_or_else(|| self.name.clone());
        DataSet::new(name).with_table(self)
    }

    fn column_types(&self) -> Vec<ColumnTypes> {
        self.columns.iter().map(column_types).collect()
    }

    fn decode_row(&self, row: &DataRow, types: &[ColumnTypes]) -> Result<Vec<Value>, TableError> {
        self.check_shape(row.len())?;
        self.columns
            .iter()
            .zip(types)
            .zip(&row.values)
            .map(|((column, types), text)| {
                if types.derived {
                    Ok(Value::Null)
                } else {
                    self.decode(column, types, text)
                }
            })
            .collect()
    }

    fn decode(&self, column: &DataColumn, types: &ColumnTypes, text: &str) -> Result<Value, TableError> {
        decode_cell(text, types.value_type.as_ref(), types.base_type.as_ref()).map_err(|error| {
            TableError::Cell {
                table: self.name.clone(),
                column: column.name.clone(),
                error,
            }
        })
    }

    fn check_shape(&self, actual: usize) -> Result<(), TableError> {
        if actual != self.columns.len() {
            return Err(TableError::ShapeMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual,
            });
        }
        Ok(())
    }
}

fn column_types(column: &DataColumn) -> ColumnTypes {
    ColumnTypes {
        value_type: column.resolved_value_type(),
        base_type: column.resolved_base_type(),
        derived: column.is_derived(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relational::RelationalColumn;
    use rust_decimal::Decimal;

    fn orders() -> DataTable {
        DataTable::new("Orders").with_columns(vec![
            DataColumn::new("Id", &ValueType::Int32),
            DataColumn::new("Price", &ValueType::Decimal),
            DataColumn::new("Total", &ValueType::Decimal).with_expression("Price * 2"),
        ])
    }

    #[test]
    fn test_add_row_encodes_cells() {
        let mut table = orders();
        table
            .add_row(&[Value::Int32(1), Value::Decimal(Decimal::new(995, 2)), Value::Int32(99)])
            .unwrap();
        assert_eq!(table.rows[0].values, vec!["1", "9.95", ""]);
    }

    #[test]
    fn test_shape_is_enforced() {
        let mut table = orders();
        assert!(matches!(
            table.add_row(&[Value::Int32(1)]),
            Err(TableError::ShapeMismatch { expected: 3, actual: 1, .. })
        ));
        assert!(table.push_row(DataRow::new(vec!["1".into()])).is_err());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_raw_values_skip_derived_columns() {
        let mut table = orders();
        table
            .push_row(DataRow::new(vec!["2".into(), "".into(), "ignored".into()]))
            .unwrap();
        let values = table.raw_values(&table.rows[0]).unwrap();
        assert_eq!(values, vec![Value::Int32(2), Value::Null, Value::Null]);
        assert_eq!(table.value(0, "id").unwrap(), Some(Value::Int32(2)));
    }

    #[test]
    fn test_relational_round_trip_keeps_cells() {
        let mut table = orders();
        table
            .push_row(DataRow::new(vec!["7".into(), "12.50".into(), "".into()]))
            .unwrap();

        let relational = table.to_relational().unwrap();
        assert_eq!(relational.columns[2].expression.as_deref(), Some("Price * 2"));
        assert_eq!(relational.rows[0][1], Value::Decimal(Decimal::new(1250, 2)));

        let restored = DataTable::from_relational(&relational).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_malformed_cell_names_the_column() {
        let mut table = orders();
        table
            .push_row(DataRow::new(vec!["x1".into(), "".into(), "".into()]))
            .unwrap();
        let err = table.to_relational().unwrap_err();
        assert!(matches!(err, TableError::Cell { ref column, .. } if column == "Id"));
    }

    #[test]
    fn test_from_relational_requires_conforming_rows() {
        let mut relational = RelationalTable::new("Numbers");
        relational
            .add_column(RelationalColumn::new("N", ValueType::Int64))
            .unwrap();
        relational.add_row(vec![Value::Int64(3)]).unwrap();
        let table = DataTable::from_relational(&relational).unwrap();
        assert_eq!(table.rows[0].values, vec!["3"]);
    }
}
