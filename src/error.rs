//! Crate level errors

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::coerce::CoercionError;
use crate::models::TableError;

/// Failure of a query or report request
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unknown query {0}")]
    UnknownOperation(String),

    #[error("Unknown report {0}")]
    UnknownReport(String),

    #[error("Report {0} is already registered")]
    DuplicateReport(String),

    #[error("Missing mandatory parameter {parameter} in query {operation}")]
    MissingParameter { operation: String, parameter: String },

    #[error("Unknown parameter {parameter} in query {operation}")]
    UnknownParameter { operation: String, parameter: String },

    #[error("Invalid value for parameter {parameter}: {error}")]
    ParameterCoercion {
        parameter: String,
        #[source]
        error: CoercionError,
    },

    #[error("Missing handler {handler} for query {operation}")]
    HandlerUnavailable { operation: String, handler: String },

    #[error("Query {operation} failed: {message}")]
    Upstream {
        operation: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
