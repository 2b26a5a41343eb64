//! Describe command implementation

use super::load_data_set;
use crate::cli::error::CliError;
use crate::cli::output::{DataSetSummary, format_compact_output, format_pretty_output};

/// Handle the describe command; `output` is `pretty`, `compact` or `json`
pub fn handle_describe(input: &str, format: Option<&str>, output: &str) -> Result<(), CliError> {
    let data_set = load_data_set(input, format)?;

    let text = match output {
        "pretty" => format_pretty_output(&data_set),
        "compact" => format_compact_output(&data_set),
        "json" => serde_json::to_string_pretty(&DataSetSummary::new(&data_set))
            .map_err(|e| CliError::InvalidArgument(format!("Failed to serialize summary: {}", e)))?,
        _ => {
            return Err(CliError::InvalidArgument(format!("Unknown output mode: {}", output)));
        }
    };

    println!("{}", text);
    Ok(())
}
