//! Tabular model
//!
//! Self-describing data sets: tables of typed columns and text cells, plus
//! the relations between tables. See [`crate::coerce`] for the cell encoding
//! and [`crate::relational`] for the natively typed counterpart.

pub mod column;
pub mod data_set;
pub mod error;
pub mod relation;
pub mod row;
pub mod table;

pub use column::DataColumn;
pub use data_set::DataSet;
pub use error::{RelationEndpoint, TableError};
pub use relation::DataRelation;
pub use row::DataRow;
pub use table::DataTable;
