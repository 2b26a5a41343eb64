//! Row model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered cells of one table row; an empty cell is null
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct DataRow {
    pub values: Vec<String>,
}

impl DataRow {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

impl From<Vec<String>> for DataRow {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

impl fmt::Display for DataRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.values.join(", "))
    }
}
