//! Item projection
//!
//! Turns a sequence of records into a [`RelationalTable`]. Columns are taken
//! from the first item; every item then contributes one row. Cells that
//! cannot be resolved or do not fit their column stay null.

use tracing::debug;

use crate::models::{DataTable, TableError};
use crate::reflect::{PropertyResolver, PropertyValue, Record, ResolvedProperty};
use crate::relational::{RelationalColumn, RelationalTable};
use crate::value::Value;

/// Options of a projection
#[derive(Debug, Clone, Default)]
pub struct ProjectionOptions {
    /// Table name, defaults to the type name of the first item
    pub table_name: Option<String>,
    /// Only build the columns
    pub ignore_rows: bool,
    /// Property marking the primary key column
    pub primary_key: Option<String>,
    /// Property paths to project, defaults to all properties
    pub properties: Option<Vec<String>>,
}

impl ProjectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_ignore_rows(mut self, ignore_rows: bool) -> Self {
        self.ignore_rows = ignore_rows;
        self
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = Some(properties.into_iter().map(Into::into).collect());
        self
    }
}

/// Projects records into tables
#[derive(Debug, Clone, Copy)]
pub struct ItemProjector<'c> {
    resolver: PropertyResolver<'c>,
}

impl Default for ItemProjector<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemProjector<'static> {
    pub fn new() -> Self {
        Self {
            resolver: PropertyResolver::new(),
        }
    }
}

impl<'c> ItemProjector<'c> {
    pub fn with_resolver(resolver: PropertyResolver<'c>) -> Self {
        Self { resolver }
    }

    /// Project items into a new table.
    ///
    /// Without items the table has no columns and is named after the
    /// requested table name, or left unnamed.
    pub fn project<'a, I>(&self, items: I, options: &ProjectionOptions) -> Result<RelationalTable, TableError>
    where
        I: IntoIterator<Item = &'a dyn Record>,
    {
        let mut table: Option<RelationalTable> = None;

        for item in items {
            if table.is_none() {
                table = Some(self.create_table(item, options)?);
            }
            if let Some(current) = table.as_mut()
                && !options.ignore_rows
            {
                self.append_item(current, item, options.properties.as_deref())?;
            }
        }

        Ok(table.unwrap_or_else(|| RelationalTable::new(options.table_name.clone().unwrap_or_default())))
    }

    /// Append one row per item to an existing table
    pub fn append_items<'a, I>(
        &self,
        table: &mut RelationalTable,
        items: I,
        properties: Option<&[String]>,
    ) -> Result<(), TableError>
    where
        I: IntoIterator<Item = &'a dyn Record>,
    {
        for item in items {
            self.append_item(table, item, properties)?;
        }
        Ok(())
    }

    /// Project items into a tabular table
    pub fn project_to_data_table<'a, I>(&self, items: I, options: &ProjectionOptions) -> Result<DataTable, TableError>
    where
        I: IntoIterator<Item = &'a dyn Record>,
    {
        let table = self.project(items, options)?;
        DataTable::from_relational(&table)
    }

    fn create_table(&self, item: &dyn Record, options: &ProjectionOptions) -> Result<RelationalTable, TableError> {
        let name = options
            .table_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| item.type_name());
        let mut table = RelationalTable::new(name);

        for path in self.property_paths(item, options.properties.as_deref()) {
            let Some(resolved) = self.resolver.resolve(Some(item), &path) else {
                debug!(table = %table.name, property = %path, "Skipping unresolvable column");
                continue;
            };

            // later items may lack the property, so every projected column takes nulls
            let column_type = resolved.property.property_type.column_type();
            table.add_column(RelationalColumn::new(resolved.name(), column_type))?;

            if options.primary_key.as_deref() == Some(resolved.property.name) {
                table.set_primary_key(resolved.name())?;
            }
        }
        Ok(table)
    }

    fn append_item(
        &self,
        table: &mut RelationalTable,
        item: &dyn Record,
        properties: Option<&[String]>,
    ) -> Result<(), TableError> {
        let mut row = table.new_row();
        let mut resolved_any = false;

        for path in self.property_paths(item, properties) {
            let Some(resolved) = self.resolver.resolve(Some(item), &path) else {
                continue;
            };
            resolved_any = true;

            let Some(index) = table.column_index(resolved.name()) else {
                debug!(table = %table.name, column = %resolved.name(), "Skipping value without column");
                continue;
            };

            let value = cell_value(&resolved);
            if value.is_null() {
                continue;
            }

            let column = &table.columns[index];
            if column.is_derived() {
                continue;
            }
            if !value.conforms_to(&column.value_type) {
                debug!(
                    table = %table.name,
                    column = %column.name,
                    value_type = %column.value_type,
                    "Skipping non-conforming value"
                );
                continue;
            }
            row[index] = value;
        }

        if !resolved_any {
            return Ok(());
        }
        table.add_row(row)
    }

    fn property_paths(&self, item: &dyn Record, properties: Option<&[String]>) -> Vec<String> {
        match properties {
            Some(properties) => properties.to_vec(),
            None => self
                .resolver
                .cache()
                .properties(item)
                .iter()
                .map(|p| p.name.to_string())
                .collect(),
        }
    }
}

/// Cell value of a resolved property; serialized properties become JSON text
fn cell_value(resolved: &ResolvedProperty<'_>) -> Value {
    if !resolved.property.property_type.is_serialized() {
        return match &resolved.value {
            PropertyValue::Value(value) => value.clone(),
            _ => Value::Null,
        };
    }

    match &resolved.value {
        PropertyValue::Null => Value::Null,
        PropertyValue::Value(Value::String(text)) => Value::String(text.clone()),
        PropertyValue::Value(value) if value.is_null() => Value::Null,
        PropertyValue::Json(json) if json.is_null() => Value::Null,
        other => Value::String(other.to_json().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Tag {
        key: String,
    }

    crate::impl_record!(Tag { "Key" => key });

    #[derive(Serialize)]
    struct Item {
        id: i32,
        label: Option<String>,
        tag: Option<Tag>,
        extra: BTreeMap<String, serde_json::Value>,
    }

    crate::impl_record!(Item {
        "Id" => id,
        "Label" => label,
        "Tag" => tag,
        "Extra" => extra,
    });

    fn items() -> Vec<Item> {
        let mut extra = BTreeMap::new();
        extra.insert("color".to_string(), serde_json::json!("red"));
        vec![
            Item {
                id: 1,
                label: Some("one".into()),
                tag: Some(Tag { key: "k1".into() }),
                extra,
            },
            Item {
                id: 2,
                label: None,
                tag: None,
                extra: BTreeMap::new(),
            },
        ]
    }

    fn records(items: &[Item]) -> impl Iterator<Item = &dyn Record> {
        items.iter().map(|item| item as &dyn Record)
    }

    #[test]
    fn test_columns_follow_first_item() {
        let items = items();
        let table = ItemProjector::new()
            .project(records(&items), &ProjectionOptions::new().with_primary_key("Id"))
            .unwrap();

        assert_eq!(table.name, "Item");
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Label", "Tag", "Extra"]);
        assert_eq!(table.columns[2].value_type, ValueType::String);
        assert!(table.columns.iter().all(|c| c.allow_null));
        assert_eq!(table.primary_key, Some(0));
        assert_eq!(table.rows.len(), 2);
    }

    #[derive(Serialize)]
    struct Full {
        id: i32,
        name: String,
    }

    crate::impl_record!(Full {
        "Id" => id,
        "Name" => name,
    });

    #[derive(Serialize)]
    struct Partial {
        id: i32,
    }

    crate::impl_record!(Partial { "Id" => id });

    #[derive(Serialize)]
    struct Mismatch {
        id: i32,
        name: i64,
    }

    crate::impl_record!(Mismatch {
        "Id" => id,
        "Name" => name,
    });

    #[test]
    fn test_mixed_items_leave_cells_null() {
        let full = Full {
            id: 1,
            name: "a".into(),
        };
        let partial = Partial { id: 2 };
        let mismatch = Mismatch { id: 3, name: 7 };
        let items: Vec<&dyn Record> = vec![&full, &partial, &mismatch];

        let table = ItemProjector::new()
            .project(items, &ProjectionOptions::new())
            .unwrap();

        assert_eq!(table.name, "Full");
        assert_eq!(table.columns[1].value_type, ValueType::String);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.value(0, "Name"), Some(&Value::from("a")));
        assert_eq!(table.value(1, "Id"), Some(&Value::Int32(2)));
        assert_eq!(table.value(1, "Name"), Some(&Value::Null));
        assert_eq!(table.value(2, "Id"), Some(&Value::Int32(3)));
        assert_eq!(table.value(2, "Name"), Some(&Value::Null));
    }

    #[test]
    fn test_objects_become_json_text() {
        let items = items();
        let table = ItemProjector::new()
            .project(records(&items), &ProjectionOptions::new())
            .unwrap();
        assert_eq!(table.value(0, "Tag"), Some(&Value::from("{\"key\":\"k1\"}")));
        assert_eq!(table.value(1, "Tag"), Some(&Value::Null));
        assert_eq!(table.value(1, "Label"), Some(&Value::Null));
    }

    #[test]
    fn test_dictionary_columns_use_the_key() {
        let items = items();
        let options = ProjectionOptions::new()
            .with_table_name("Colors")
            .with_properties(["Id", "Extra.color", "Missing"]);
        let table = ItemProjector::new().project(records(&items), &options).unwrap();

        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "color"]);
        assert_eq!(table.value(0, "color"), Some(&Value::from("red")));
        assert_eq!(table.value(1, "color"), Some(&Value::Null));
    }

    #[test]
    fn test_empty_input_and_ignored_rows() {
        let projector = ItemProjector::new();
        let empty = projector
            .project(std::iter::empty(), &ProjectionOptions::new().with_table_name("Nothing"))
            .unwrap();
        assert_eq!(empty.name, "Nothing");
        assert!(empty.columns.is_empty());

        let items = items();
        let headers = projector
            .project(records(&items), &ProjectionOptions::new().with_ignore_rows(true))
            .unwrap();
        assert_eq!(headers.columns.len(), 4);
        assert!(headers.rows.is_empty());
    }

    #[test]
    fn test_duplicate_columns_fail() {
        let items = items();
        let options = ProjectionOptions::new().with_properties(["Id", "Id"]);
        let err = ItemProjector::new().project(records(&items), &options).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_project_to_data_table() {
        let items = items();
        let table = ItemProjector::new()
            .project_to_data_table(records(&items), &ProjectionOptions::new().with_properties(["Id", "Label"]))
            .unwrap();
        assert_eq!(table.rows[0].values, vec!["1", "one"]);
        assert_eq!(table.rows[1].values, vec!["2", ""]);
    }
}
