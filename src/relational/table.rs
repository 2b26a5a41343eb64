//! Relational table with natively typed columns and rows

use tracing::debug;

use crate::models::TableError;
use crate::value::{Value, ValueType};

/// Typed column of a [`RelationalTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct RelationalColumn {
    pub name: String,
    pub value_type: ValueType,
    pub allow_null: bool,
    /// Derived columns hold no stored values
    pub expression: Option<String>,
}

impl RelationalColumn {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            allow_null: true,
            expression: None,
        }
    }

    pub fn with_allow_null(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
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
}

/// In-memory table holding [`Value`]s
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationalTable {
    pub name: String,
    pub columns: Vec<RelationalColumn>,
    pub rows: Vec<Vec<Value>>,
    /// Index of the primary key column
    pub primary_key: Option<usize>,
}

impl RelationalTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Column position by name; exact match first, then ignoring case
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

    pub fn column(&self, name: &str) -> Option<&RelationalColumn> {
        self.column_index(name).map(|index| &self.columns[index])
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a column; existing rows get a null cell
    pub fn add_column(&mut self, column: RelationalColumn) -> Result<usize, TableError> {
        if self.contains_column(&column.name) {
            return Err(TableError::DuplicateColumn {
                table: self.name.clone(),
                column: column.name,
            });
        }
        self.columns.push(column);
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        Ok(self.columns.len() - 1)
    }

    pub fn set_primary_key(&mut self, column: &str) -> Result<(), TableError> {
        let index = self
            .column_index(column)
            .ok_or_else(|| self.unknown_column(column))?;
        self.primary_key = Some(index);
        Ok(())
    }

    pub fn primary_key_column(&self) -> Option<&RelationalColumn> {
        self.primary_key.and_then(|index| self.columns.get(index))
    }

    /// A row of nulls matching the column count
    pub fn new_row(&self) -> Vec<Value> {
        vec![Value::Null; self.columns.len()]
    }

    /// Append a row after checking its shape and value types
    pub fn add_row(&mut self, values: Vec<Value>) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::ShapeMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        let mut values = values;
        for (column, value) in self.columns.iter().zip(values.iter_mut()) {
            if column.is_derived() {
                *value = Value::Null;
                continue;
            }
            self.check_value(column, value)?;
        }

        self.rows.push(values);
        Ok(())
    }

    /// Cell value by row position and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|values| values.get(index))
    }

    pub fn set_value(&mut self, row: usize, column: &str, value: Value) -> Result<(), TableError> {
        let index = self
            .column_index(column)
            .ok_or_else(|| self.unknown_column(column))?;
        self.check_value(&self.columns[index], &value)?;

        let row_count = self.rows.len();
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|values| values.get_mut(index))
            .ok_or(TableError::RowOutOfRange {
                row,
                rows: row_count,
            })?;
        *cell = value;
        Ok(())
    }

    /// Write name/value pairs into a row.
    ///
    /// Missing columns are added, typed after their value. Blank names and
    /// null values are skipped.
    pub fn transpose_values<I, K>(&mut self, row: usize, items: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (name, value) in items {
            let name = name.as_ref();
            if name.trim().is_empty() {
                continue;
            }
            let Some(value_type) = value.value_type() else {
                continue;
            };
            if !self.contains_column(name) {
                self.add_column(RelationalColumn::new(name, value_type))?;
            }
            self.set_value(row, name, value)?;
        }
        Ok(())
    }

    /// Copy a row of another table into a row of this table.
    ///
    /// Columns missing here are only created when `column_type` is given; it
    /// maps a source column to the type of the new column. Otherwise those
    /// values are dropped.
    pub fn transpose_row(
        &mut self,
        row: usize,
        source: &RelationalTable,
        source_row: usize,
        column_type: Option<&dyn Fn(&RelationalColumn) -> ValueType>,
    ) -> Result<(), TableError> {
        let values = source.rows.get(source_row).ok_or(TableError::RowOutOfRange {
            row: source_row,
            rows: source.rows.len(),
        })?;

        for (source_column, value) in source.columns.iter().zip(values) {
            match self.column(&source_column.name) {
                Some(target) if target.value_type != source_column.value_type => {
                    return Err(TableError::ColumnTypeMismatch {
                        column: source_column.name.clone(),
                        source_type: source_column.value_type.identifier(),
                        target_type: target.value_type.identifier(),
                    });
                }
                Some(_) => {}
                None => match column_type {
                    Some(column_type) => {
                        let column = RelationalColumn::new(
                            source_column.name.clone(),
                            column_type(source_column),
                        );
                        self.add_column(column)?;
                    }
                    None => {
                        debug!(
                            table = %self.name,
                            column = %source_column.name,
                            "Skipping transposed value without target column"
                        );
                        continue;
                    }
                },
            }

            if !value.is_null() {
                self.set_value(row, &source_column.name, value.clone())?;
            }
        }
        Ok(())
    }

    fn check_value(&self, column: &RelationalColumn, value: &Value) -> Result<(), TableError> {
        if value.is_null() && !column.allow_null {
            return Err(TableError::NullValue {
                table: self.name.clone(),
                column: column.name.clone(),
            });
        }
        if !value.conforms_to(&column.value_type) {
            return Err(TableError::ValueTypeMismatch {
                table: self.name.clone(),
                column: column.name.clone(),
                value_type: column.value_type.identifier(),
                value: value.to_text(),
            });
        }
        Ok(())
    }

    fn unknown_column(&self, column: &str) -> TableError {
        TableError::UnknownColumn {
            table: self.name.clone(),
            column: column.to_string(),
        }
    }
}
