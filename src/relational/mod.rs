//! Relational form
//!
//! The conventional in-memory dataset: tables with natively typed columns
//! and rows, and named relations between them. [`crate::models`] converts to
//! and from this form.

mod table;

pub use table::{RelationalColumn, RelationalTable};

use crate::models::{RelationEndpoint, TableError};

/// Named parent/child link between columns of two tables
#[derive(Debug, Clone, PartialEq)]
pub struct RelationalRelation {
    pub name: String,
    pub parent_table: String,
    pub parent_columns: Vec<String>,
    pub child_table: String,
    pub child_columns: Vec<String>,
}

/// A set of relational tables and their relations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationalDataSet {
    pub name: String,
    pub tables: Vec<RelationalTable>,
    pub relations: Vec<RelationalRelation>,
}

impl RelationalDataSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Table by name, ignoring case
    pub fn table(&self, name: &str) -> Option<&RelationalTable> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .or_else(|| self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut RelationalTable> {
        let index = self
            .tables
            .iter()
            .position(|t| t.name == name)
            .or_else(|| self.tables.iter().position(|t| t.name.eq_ignore_ascii_case(name)))?;
        self.tables.get_mut(index)
    }

    pub fn add_table(&mut self, table: RelationalTable) {
        self.tables.push(table);
    }

    /// Add a single-column relation after checking both endpoints exist
    pub fn add_relation(
        &mut self,
        name: &str,
        parent_table: &str,
        parent_column: &str,
        child_table: &str,
        child_column: &str,
    ) -> Result<(), TableError> {
        let missing = |endpoint: RelationEndpoint, missing: &str| TableError::MissingRelationEndpoint {
            relation: name.to_string(),
            endpoint,
            name: missing.to_string(),
        };

        let parent = self
            .table(parent_table)
            .ok_or_else(|| missing(RelationEndpoint::ParentTable, parent_table))?;
        let parent_column = parent
            .column(parent_column)
            .ok_or_else(|| missing(RelationEndpoint::ParentColumn, parent_column))?
            .name
            .clone();
        let parent_table = parent.name.clone();

        let child = self
            .table(child_table)
            .ok_or_else(|| missing(RelationEndpoint::ChildTable, child_table))?;
        let child_column = child
            .column(child_column)
            .ok_or_else(|| missing(RelationEndpoint::ChildColumn, child_column))?
            .name
            .clone();
        let child_table = child.name.clone();

        self.relations.push(RelationalRelation {
            name: name.to_string(),
            parent_table,
            parent_columns: vec![parent_column],
            child_table,
            child_columns: vec![child_column],
        });
        Ok(())
    }
}
