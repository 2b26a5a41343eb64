//! Catalog discovery filter

use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicates selecting the modules, handlers and operations a catalog
/// includes. Absent predicates include everything.
#[derive(Clone, Default)]
pub struct QueryFilter {
    module: Option<Predicate>,
    handler: Option<Predicate>,
    operation: Option<Predicate>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by module name; handlers without a module are matched as ""
    pub fn modules<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.module = Some(Arc::new(predicate));
        self
    }

    /// Filter by handler type name
    pub fn handlers<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(predicate));
        self
    }

    /// Filter by operation name
    pub fn operations<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.operation = Some(Arc::new(predicate));
        self
    }

    pub fn includes_module(&self, module: Option<&str>) -> bool {
        self.module
            .as_ref()
            .is_none_or(|predicate| predicate(module.unwrap_or_default()))
    }

    pub fn includes_handler(&self, handler: &str) -> bool {
        self.handler.as_ref().is_none_or(|predicate| predicate(handler))
    }

    pub fn includes_operation(&self, operation: &str) -> bool {
        self.operation
            .as_ref()
            .is_none_or(|predicate| predicate(operation))
    }
}

impl fmt::Debug for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryFilter")
            .field("module", &self.module.is_some())
            .field("handler", &self.handler.is_some())
            .field("operation", &self.operation.is_some())
            .finish()
    }
}
