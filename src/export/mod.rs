//! Export functionality
//!
//! Writes data sets as JSON or YAML documents and reads them back:
//! - JSON (camelCase, indented)
//! - YAML

pub mod document;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use document::DataSetExporter;

/// Document format of an exported data set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    /// Format by file extension; `None` for unknown extensions
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse().ok()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Result of an export operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Exported document
    pub content: String,
    pub format: ExportFormat,
}

/// Error during export or import
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
