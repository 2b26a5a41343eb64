//! Table errors shared by the tabular and relational forms

use std::fmt;

use thiserror::Error;

use crate::coerce::CoercionError;

/// The part of a relation that could not be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationEndpoint {
    ParentTable,
    ParentColumn,
    ChildTable,
    ChildColumn,
}

impl fmt::Display for RelationEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RelationEndpoint::ParentTable => "parent table",
            RelationEndpoint::ParentColumn => "parent column",
            RelationEndpoint::ChildTable => "child table",
            RelationEndpoint::ChildColumn => "child column",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("Row value count ({actual}) is not matching the column count ({expected}) in table {table}")]
    ShapeMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column {column} in table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("Unknown column {column} in table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("Row {row} out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Missing relation {endpoint} {name} in relation {relation}")]
    MissingRelationEndpoint {
        relation: String,
        endpoint: RelationEndpoint,
        name: String,
    },

    #[error("Mismatching types in column {column}: source {source_type}, target {target_type}")]
    ColumnTypeMismatch {
        column: String,
        source_type: String,
        target_type: String,
    },

    #[error("Value '{value}' does not conform to column {table}.{column} of type {value_type}")]
    ValueTypeMismatch {
        table: String,
        column: String,
        value_type: String,
        value: String,
    },

    #[error("Column {table}.{column} does not allow null values")]
    NullValue { table: String, column: String },

    #[error("Invalid cell in column {table}.{column}: {error}")]
    Cell {
        table: String,
        column: String,
        #[source]
        error: CoercionError,
    },
}
