//! Relation model

use serde::{Deserialize, Serialize};

fn default_key_column() -> String {
    "Id".to_string()
}

/// Parent/child link between two tables of a [`DataSet`](super::DataSet)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataRelation {
    pub name: String,
    pub parent_table: String,
    #[serde(default = "default_key_column")]
    pub parent_column: String,
    pub child_table: String,
    pub child_column: String,
}

impl DataRelation {
    pub fn new(
        name: impl Into<String>,
        parent_table: impl Into<String>,
        parent_column: impl Into<String>,
        child_table: impl Into<String>,
        child_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parent_table: parent_table.into(),
            parent_column: parent_column.into(),
            child_table: child_table.into(),
            child_column: child_column.into(),
        }
    }
}
