//! CLI errors

use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportError;
use crate::models::TableError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Validation failed: {0}")]
    ValidationError(#[from] TableError),
}
