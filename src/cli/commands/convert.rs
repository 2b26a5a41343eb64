//! Convert command implementation

use std::path::{Path, PathBuf};

use tracing::info;

use super::{load_data_set, resolve_format};
use crate::cli::error::CliError;
use crate::export::DataSetExporter;

/// Handle the convert command: re-encode a data set document, writing to
/// `output` or stdout (`-`)
pub fn handle_convert(
    input: &str,
    output: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(), CliError> {
    let data_set = load_data_set(input, from)?;

    // validate before writing
    data_set.to_relational()?;

    let format = resolve_format(to, output)?;
    let result = DataSetExporter::export(&data_set, format)?;

    if output == "-" {
        println!("{}", result.content);
        return Ok(());
    }

    let path = PathBuf::from(output);
    write_output(&path, &result.content)?;
    info!(output = %path.display(), format = %format, "Wrote data set");
    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<(), CliError> {
    std::fs::write(path, content).map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))
}
