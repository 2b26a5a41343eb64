//! API Reporting SDK - query catalog and tabular reporting for API read operations
//!
//! Provides:
//! - An operation catalog built from host handler registrations
//! - Parameter binding from loosely typed request maps
//! - Query execution with result unwrapping and projection into tables
//! - A self-describing tabular model (data set, table, column, row) with a
//!   loss-free text encoding per cell
//! - Conversion between the tabular model and a typed relational form
//! - Report registration and building
//! - JSON and YAML documents of data sets

pub mod binder;
pub mod catalog;
pub mod coerce;
pub mod config;
pub mod convert;
pub mod error;
pub mod executor;
pub mod export;
pub mod models;
pub mod reflect;
pub mod relational;
pub mod report;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use binder::{Arguments, BoundParameter, ParameterBinder};
pub use catalog::{
    CatalogError, HandlerType, OperationCatalog, OperationDescriptor, OperationSpec, ParameterDescriptor, QueryFilter,
};
pub use coerce::{CoercionError, decode_cell, encode_cell};
pub use config::ReportingConfig;
pub use convert::{ItemProjector, ProjectionOptions};
pub use error::ReportError;
pub use executor::{
    HandlerActivator, QueryContext, QueryExecutor, QueryRequest, QueryResult, ResultAdapter, StaticActivator,
    StatusPayload,
};
pub use export::{DataSetExporter, ExportError, ExportFormat, ExportResult};
pub use models::{DataColumn, DataRelation, DataRow, DataSet, DataTable, TableError};
pub use reflect::{PropertyResolver, Record, ResolvedProperty};
pub use relational::{RelationalColumn, RelationalDataSet, RelationalRelation, RelationalTable};
pub use report::{Report, ReportInfo, ReportRequest, ReportResponse, ReportService};
pub use value::{Enumeration, Value, ValueType};
