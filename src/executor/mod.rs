//! Query execution
//!
//! The [`QueryExecutor`] runs a catalog operation end to end: lookup,
//! handler activation, parameter binding, invocation, result unwrapping and
//! projection into a [`RelationalTable`].

mod activator;
mod result;

pub use activator::{HandlerActivator, QueryContext, StaticActivator};
pub use result::{QueryResult, ResultAdapter, StatusPayload, StatusResult};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::binder::{Arguments, ParameterBinder};
use crate::catalog::{OperationCatalog, OperationDescriptor};
use crate::coerce::coerce_value;
use crate::config::ReportingConfig;
use crate::convert::{ItemProjector, ProjectionOptions};
use crate::error::ReportError;
use crate::models::{DataSet, DataTable};
use crate::reflect::Record;
use crate::relational::{RelationalColumn, RelationalTable};
use crate::value::{Value, ValueType};

/// Request to run one operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    pub operation: String,
    pub parameters: HashMap<String, String>,
    /// Property marking the primary key column of the result table
    pub primary_key: Option<String>,
    /// Overrides [`ReportingConfig::strict_parameters`]
    pub strict_parameters: Option<bool>,
}

impl QueryRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_parameters = Some(strict);
        self
    }
}

/// Runs catalog operations and projects their results
#[derive(Clone)]
pub struct QueryExecutor {
    catalog: Arc<OperationCatalog>,
    activator: Arc<dyn HandlerActivator>,
    config: ReportingConfig,
    projector: ItemProjector<'static>,
}

impl QueryExecutor {
    pub fn new(catalog: Arc<OperationCatalog>, activator: Arc<dyn HandlerActivator>) -> Self {
        Self {
            catalog,
            activator,
            config: ReportingConfig::default(),
            projector: ItemProjector::new(),
        }
    }

    pub fn with_config(mut self, config: ReportingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ReportingConfig {
        &self.config
    }

    /// Operation by name, ignoring case
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.catalog.operation(name)
    }

    /// Run an operation; `Ok(None)` when it produced no items
    pub async fn query(
        &self,
        request: &QueryRequest,
        context: &QueryContext,
    ) -> Result<Option<RelationalTable>, ReportError> {
        self.query_with(request, context, |_, _| {}).await
    }

    /// Run an operation into a single table data set named `data_set_name`;
    /// `Ok(None)` when it produced no items
    pub async fn query_set(
        &self,
        data_set_name: &str,
        request: &QueryRequest,
        context: &QueryContext,
    ) -> Result<Option<DataSet>, ReportError> {
        let Some(table) = self.query(request, context).await? else {
            return Ok(None);
        };
        let data_set = DataTable::from_relational(&table)?.into_data_set(Some(data_set_name));
        Ok(Some(data_set))
    }

    /// Run an operation, passing the unwrapped items to `items_loaded`
    /// before they are projected
    pub async fn query_with<F>(
        &self,
        request: &QueryRequest,
        context: &QueryContext,
        items_loaded: F,
    ) -> Result<Option<RelationalTable>, ReportError>
    where
        F: FnOnce(&QueryRequest, &[Box<dyn Record>]),
    {
        let entry = self
            .catalog
            .entry(&request.operation)
            .ok_or_else(|| ReportError::UnknownOperation(request.operation.clone()))?;
        let descriptor = &entry.descriptor;

        let unavailable = || ReportError::HandlerUnavailable {
            operation: descriptor.name.clone(),
            handler: descriptor.handler.clone(),
        };

        let instance = self
            .activator
            .activate(&descriptor.handler, context)
            .ok_or_else(unavailable)?;

        let strict = request.strict_parameters.unwrap_or(self.config.strict_parameters);
        let arguments = ParameterBinder::bind(&descriptor.name, &descriptor.parameters, &request.parameters, strict)?;

        debug!(operation = %descriptor.name, parameters = arguments.len(), "Running query");
        let invocation = (entry.invoker)(instance, arguments.clone()).ok_or_else(unavailable)?;
        let result = invocation.resolve().await.map_err(|error| {
            warn!(operation = %descriptor.name, error = %error, "Query failed");
            ReportError::Upstream {
                operation: descriptor.name.clone(),
                message: format!("{:#}", error),
                status_code: None,
            }
        })?;

        let items = result::unwrap_result(result).map_err(|failure| {
            warn!(
                operation = %descriptor.name,
                status_code = ?failure.status_code,
                "Query returned an error status"
            );
            ReportError::Upstream {
                operation: descriptor.name.clone(),
                message: failure.message,
                status_code: failure.status_code,
            }
        })?;
        let Some(items) = items else {
            debug!(operation = %descriptor.name, "Query returned no result");
            return Ok(None);
        };

        items_loaded(request, &items);

        let table = self.result_table(descriptor, &items, &arguments, request.primary_key.as_deref())?;
        debug!(
            operation = %descriptor.name,
            table = %table.name,
            rows = table.rows.len(),
            "Query completed"
        );
        Ok(Some(table))
    }

    fn result_table(
        &self,
        descriptor: &OperationDescriptor,
        items: &[Box<dyn Record>],
        arguments: &Arguments,
        primary_key: Option<&str>,
    ) -> Result<RelationalTable, ReportError> {
        let mut options = ProjectionOptions::new()
            .with_table_name(self.config.table_name(&descriptor.name))
            .with_ignore_rows(true);
        options.primary_key = primary_key.map(str::to_string);

        let mut table = self.projector.project(records(items), &options)?;

        let parameter_columns = if self.config.append_parameter_columns {
            parameter_columns(arguments)
        } else {
            Vec::new()
        };
        for column in &parameter_columns {
            if !table.contains_column(&column.name) {
                table.add_column(RelationalColumn::new(column.name.clone(), column.value_type.clone()))?;
            }
        }

        self.projector.append_items(&mut table, records(items), None)?;

        for column in parameter_columns {
            set_parameter_values(&mut table, &column)?;
        }
        Ok(table)
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn records(items: &[Box<dyn Record>]) -> impl Iterator<Item = &dyn Record> {
    items.iter().map(|item| item.as_ref() as &dyn Record)
}

/// Result column carrying a bound parameter value
struct ParameterColumn {
    name: String,
    value_type: ValueType,
    value: Value,
}

fn parameter_columns(arguments: &Arguments) -> Vec<ParameterColumn> {
    let mut columns: Vec<ParameterColumn> = Vec::new();
    for parameter in arguments {
        let name = first_char_upper(&parameter.descriptor.name);
        if name.is_empty() || columns.iter().any(|column| column.name.eq_ignore_ascii_case(&name)) {
            continue;
        }

        let value_type = parameter
            .descriptor
            .type_descriptor()
            .map(|descriptor| descriptor.value_type)
            .filter(|value_type| !value_type.is_structured())
            .unwrap_or(ValueType::String);
        let value = match &parameter.value {
            Value::Json(json) => Value::String(json.to_string()),
            other => other.clone(),
        };

        columns.push(ParameterColumn { name, value_type, value });
    }
    columns
}

fn set_parameter_values(table: &mut RelationalTable, column: &ParameterColumn) -> Result<(), ReportError> {
    if column.value.is_null() {
        return Ok(());
    }
    let Some(target) = table.column(&column.name) else {
        return Ok(());
    };
    if target.is_derived() {
        return Ok(());
    }

    let value = match coerce_value(&column.value, &target.value_type) {
        Ok(value) => value,
        Err(error) => {
            debug!(table = %table.name, column = %column.name, error = %error, "Skipping parameter column value");
            return Ok(());
        }
    };

    for row in 0..table.rows.len() {
        table.set_value(row, &column.name, value.clone())?;
    }
    Ok(())
}

fn first_char_upper(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
