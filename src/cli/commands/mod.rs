//! CLI commands

pub mod convert;
pub mod describe;
pub mod validate;

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::export::{DataSetExporter, ExportFormat};
use crate::models::DataSet;

/// Load input content from file or stdin (`-`)
pub fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Document format from an explicit name, else from the file extension,
/// else JSON
pub fn resolve_format(format: Option<&str>, input: &str) -> Result<ExportFormat, CliError> {
    match format {
        Some(format) => format
            .parse()
            .map_err(|_| CliError::InvalidArgument(format!("Unknown format: {}", format))),
        None => Ok(ExportFormat::from_path(Path::new(input)).unwrap_or_default()),
    }
}

/// Read a data set document
pub fn load_data_set(input: &str, format: Option<&str>) -> Result<DataSet, CliError> {
    let format = resolve_format(format, input)?;
    let content = load_input(input)?;
    Ok(DataSetExporter::import(&content, format)?)
}
