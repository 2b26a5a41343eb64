//! Output formatting for CLI

use serde::Serialize;

use crate::models::{DataColumn, DataSet};

/// Summary of one table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub name: String,
    pub columns: Vec<DataColumn>,
    pub rows: usize,
}

/// Summary of a data set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSetSummary {
    pub name: String,
    pub tables: Vec<TableSummary>,
    pub relations: Vec<String>,
}

impl DataSetSummary {
    pub fn new(data_set: &DataSet) -> Self {
        Self {
            name: data_set.name.clone(),
            tables: data_set
                .tables
                .iter()
                .map(|table| TableSummary {
                    name: table.name.clone(),
                    columns: table.columns.clone(),
                    rows: table.rows.len(),
                })
                .collect(),
            relations: data_set
                .relations
                .iter()
                .map(|r| {
                    format!(
                        "{}: {}.{} -> {}.{}",
                        r.name, r.parent_table, r.parent_column, r.child_table, r.child_column
                    )
                })
                .collect(),
        }
    }
}

fn column_type(column: &DataColumn) -> String {
    let value_type = column.value_type.as_deref().unwrap_or("?");
    match (&column.value_base_type, &column.expression) {
        (Some(base), _) => format!("{} ({})", value_type, base),
        (None, Some(expression)) => format!("{} = {}", value_type, expression),
        (None, None) => value_type.to_string(),
    }
}

/// Format a data set in compact mode
pub fn format_compact_output(data_set: &DataSet) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}: {} table(s)\n", data_set.name, data_set.tables.len()));
    for table in &data_set.tables {
        let col_names: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{}:{}", c.name, c.value_type.as_deref().unwrap_or("?")))
            .collect();
        output.push_str(&format!(
            "  {} [{} row(s)] {}\n",
            table.name,
            table.rows.len(),
            col_names.join(", ")
        ));
    }
    if !data_set.relations.is_empty() {
        output.push_str(&format!("  {} relation(s)\n", data_set.relations.len()));
    }

    output
}

/// Format a data set in pretty mode
pub fn format_pretty_output(data_set: &DataSet) -> String {
    let summary = DataSetSummary::new(data_set);
    let mut output = String::new();

    output.push_str(&format!("Data set {:?}\n", summary.name));
    for (idx, table) in summary.tables.iter().enumerate() {
        output.push_str(&format!("\nTable {}: {:?}\n", idx + 1, table.name));
        output.push_str(&format!("  Rows: {}\n", table.rows));
        output.push_str("  Columns:\n");
        for column in &table.columns {
            output.push_str(&format!("    - {} ({})\n", column.name, column_type(column)));
        }
    }

    if !summary.relations.is_empty() {
        output.push_str("\nRelations:\n");
        for relation in &summary.relations {
            output.push_str(&format!("  - {}\n", relation));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataRelation, DataTable};
    use crate::value::ValueType;

    fn data_set() -> DataSet {
        DataSet::new("Staff")
            .with_table(DataTable::new("Tenants").with_columns(vec![DataColumn::new("Id", &ValueType::String)]))
            .with_table(DataTable::new("Employees").with_columns(vec![
                DataColumn::new("TenantId", &ValueType::String),
                DataColumn::new("Bonus", &ValueType::Decimal).with_expression("Salary * 0.1"),
            ]))
            .with_relation(DataRelation::new("TenantEmployees", "Tenants", "Id", "Employees", "TenantId"))
    }

    #[test]
    fn test_pretty_output() {
        let output = format_pretty_output(&data_set());
        assert!(output.contains("Table 2: \"Employees\""));
        assert!(output.contains("- Bonus (decimal = Salary * 0.1)"));
        assert!(output.contains("TenantEmployees: Tenants.Id -> Employees.TenantId"));
    }

    #[test]
    fn test_compact_output() {
        let output = format_compact_output(&data_set());
        assert!(output.starts_with("Staff: 2 table(s)"));
        assert!(output.contains("Tenants [0 row(s)] Id:string"));
    }
}
