//! Validate command implementation

use tracing::info;

use super::load_data_set;
use crate::cli::error::CliError;

/// Handle the validate command.
///
/// A document is valid when it converts into the relational form: every row
/// matches its columns, every cell decodes to its column type and every
/// relation refers to existing tables and columns.
pub fn handle_validate(input: &str, format: Option<&str>) -> Result<(), CliError> {
    let data_set = load_data_set(input, format)?;
    let relational = data_set.to_relational()?;

    info!(
        data_set = %data_set.name,
        tables = relational.tables.len(),
        relations = relational.relations.len(),
        "Validated data set"
    );
    println!("Validation successful");
    Ok(())
}
