//! Operation catalog
//!
//! The catalog is built once from the handler types a host registers and is
//! read-only afterwards. Only named, non-ignored operations that pass the
//! [`QueryFilter`] become part of it.
//!
//! # Example
//!
//! ```rust
//! use api_reporting_sdk::catalog::{HandlerType, OperationCatalog, OperationSpec};
//! use api_reporting_sdk::executor::QueryResult;
//!
//! struct Ping;
//!
//! let catalog = OperationCatalog::builder()
//!     .handler(
//!         HandlerType::new("PingController")
//!             .route("api/[controller]")
//!             .operation(OperationSpec::new("GetPing").handle(|_: &Ping, _| Ok(QueryResult::Empty))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(catalog.operation("getping").unwrap().path, "api/Ping");
//! ```

mod descriptor;
mod filter;
mod handler;

pub use descriptor::{OperationDescriptor, ParameterDescriptor};
pub use filter::QueryFilter;
pub use handler::{BoxFuture, HandlerInstance, HandlerType, Invocation, OperationSpec};

pub(crate) use handler::Invoker;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

const HANDLER_SUFFIX: &str = "Controller";

static HANDLER_PLACEHOLDER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)\[controller\]").ok());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate query {name} in handler {handler}")]
    DuplicateOperation { name: String, handler: String },

    #[error("Query {name} in handler {handler} has no handler function")]
    MissingHandlerFunction { name: String, handler: String },
}

/// Catalog entry: descriptor plus the adapter calling the operation
pub(crate) struct CatalogEntry {
    pub(crate) descriptor: OperationDescriptor,
    pub(crate) invoker: Invoker,
}

/// Immutable registry of the operations a host exposes
pub struct OperationCatalog {
    entries: Vec<CatalogEntry>,
}

impl OperationCatalog {
    pub fn builder() -> OperationCatalogBuilder {
        OperationCatalogBuilder::default()
    }

    /// Descriptors in registration order
    pub fn operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Operation by name, ignoring case
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.entry(name).map(|entry| &entry.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.descriptor.name.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Debug for OperationCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.operations()).finish()
    }
}

/// Builder for OperationCatalog
#[derive(Debug, Default)]
pub struct OperationCatalogBuilder {
    filter: QueryFilter,
    handlers: Vec<HandlerType>,
}

impl OperationCatalogBuilder {
    /// Set the discovery filter
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Register a handler type
    pub fn handler(mut self, handler: HandlerType) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Build the catalog; fails on duplicate operation names
    pub fn build(self) -> Result<OperationCatalog, CatalogError> {
        let mut entries: Vec<CatalogEntry> = Vec::new();

        for handler in self.handlers {
            if handler.ignored
                || !self.filter.includes_module(handler.module.as_deref())
                || !self.filter.includes_handler(&handler.name)
            {
                debug!(handler = %handler.name, "Skipping handler");
                continue;
            }

            let handler_route = handler_route(&handler);
            for operation in handler.operations {
                let Some(name) = operation.name.filter(|name| !name.trim().is_empty()) else {
                    continue;
                };
                if operation.ignored || !self.filter.includes_operation(&name) {
                    debug!(handler = %handler.name, operation = %name, "Skipping operation");
                    continue;
                }

                if entries
                    .iter()
                    .any(|entry| entry.descriptor.name.eq_ignore_ascii_case(&name))
                {
                    return Err(CatalogError::DuplicateOperation {
                        name,
                        handler: handler.name.clone(),
                    });
                }

                let Some(invoker) = operation.invoker else {
                    return Err(CatalogError::MissingHandlerFunction {
                        name,
                        handler: handler.name.clone(),
                    });
                };

                let path = join_route(handler_route.as_deref(), operation.route.as_deref());
                entries.push(CatalogEntry {
                    descriptor: OperationDescriptor {
                        name,
                        path,
                        handler: handler.name.clone(),
                        parameters: operation.parameters,
                    },
                    invoker,
                });
            }
        }

        info!(operations = entries.len(), "Built operation catalog");
        Ok(OperationCatalog { entries })
    }
}

/// Handler route template with the handler placeholder replaced
fn handler_route(handler: &HandlerType) -> Option<String> {
    let template = handler.route.as_deref().filter(|t| !t.trim().is_empty())?;
    let handler_name = handler
        .name
        .strip_suffix(HANDLER_SUFFIX)
        .unwrap_or(&handler.name);
    match HANDLER_PLACEHOLDER.as_ref() {
        Some(placeholder) => Some(placeholder.replace_all(template, handler_name).into_owned()),
        None => Some(template.to_string()),
    }
}

fn join_route(handler_route: Option<&str>, operation_route: Option<&str>) -> String {
    let operation_route = operation_route.filter(|route| !route.trim().is_empty());
    match (handler_route, operation_route) {
        (Some(handler), Some(operation)) => format!("{}/{}", handler, operation),
        (Some(handler), None) => handler.to_string(),
        (None, Some(operation)) => operation.to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::QueryResult;

    struct Handler;

    fn operation(name: &str) -> OperationSpec {
        OperationSpec::new(name).handle(|_: &Handler, _| Ok(QueryResult::Empty))
    }

    #[test]
    fn test_routes_replace_the_placeholder() {
        let catalog = OperationCatalog::builder()
            .handler(
                HandlerType::new("EmployeesController")
                    .route("api/[Controller]")
                    .operation(operation("GetEmployees"))
                    .operation(operation("GetEmployee").route("{id}")),
            )
            .build()
            .unwrap();

        assert_eq!(catalog.operation("GetEmployees").unwrap().path, "api/Employees");
        assert_eq!(catalog.operation("getemployee").unwrap().path, "api/Employees/{id}");
        assert_eq!(catalog.operation("GetEmployee").unwrap().handler, "EmployeesController");
    }

    #[test]
    fn test_ineligible_operations_are_skipped() {
        let catalog = OperationCatalog::builder()
            .handler(
                HandlerType::new("Mixed")
                    .operation(operation("Visible"))
                    .operation(operation("Hidden").ignore())
                    .operation(OperationSpec::unnamed().handle(|_: &Handler, _| Ok(QueryResult::Empty))),
            )
            .handler(HandlerType::new("Ignored").ignore().operation(operation("Other")))
            .build()
            .unwrap();

        let names: Vec<_> = catalog.operations().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Visible"]);
    }

    #[test]
    fn test_filter_predicates() {
        let catalog = OperationCatalog::builder()
            .filter(
                QueryFilter::new()
                    .modules(|module| module == "reporting")
                    .operations(|name| name.starts_with("Get")),
            )
            .handler(
                HandlerType::new("A")
                    .module("reporting")
                    .operation(operation("GetA"))
                    .operation(operation("DeleteA")),
            )
            .handler(HandlerType::new("B").module("admin").operation(operation("GetB")))
            .build()
            .unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.operation("GetA").is_some());
    }

    #[test]
    fn test_duplicate_names_fail() {
        let result = OperationCatalog::builder()
            .handler(HandlerType::new("A").operation(operation("GetItems")))
            .handler(HandlerType::new("B").operation(operation("getitems")))
            .build();

        assert!(matches!(result, Err(CatalogError::DuplicateOperation { ref handler, .. }) if handler == "B"));
    }

    #[test]
    fn test_operations_need_a_handler_function() {
        let result = OperationCatalog::builder()
            .handler(HandlerType::new("A").operation(OperationSpec::new("GetItems")))
            .build();

        assert!(matches!(result, Err(CatalogError::MissingHandlerFunction { .. })));
    }
}
