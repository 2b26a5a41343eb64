//! Handler activation

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::catalog::HandlerInstance;

/// Per-request state handed to the activator
#[derive(Clone, Default)]
pub struct QueryContext {
    /// Free-form request attributes (user, tenant, correlation id, ...)
    pub attributes: HashMap<String, String>,
    /// Host specific request state
    pub extension: Option<Arc<dyn Any + Send + Sync>>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_extension<T: Any + Send + Sync>(mut self, extension: T) -> Self {
        self.extension = Some(Arc::new(extension));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extension.as_ref().and_then(|extension| extension.downcast_ref::<T>())
    }
}

impl fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("attributes", &self.attributes)
            .field("extension", &self.extension.is_some())
            .finish()
    }
}

/// Produces live handler instances; implemented by the host
pub trait HandlerActivator: Send + Sync {
    /// Instance of the named handler type, `None` when it cannot be created
    fn activate(&self, handler: &str, context: &QueryContext) -> Option<HandlerInstance>;
}

type Factory = Arc<dyn Fn(&QueryContext) -> HandlerInstance + Send + Sync>;

/// Activator backed by a registry of factories, keyed by handler name
#[derive(Clone, Default)]
pub struct StaticActivator {
    factories: HashMap<String, Factory>,
}

impl StaticActivator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory creating a new instance per request
    pub fn register<H, F>(mut self, handler: impl Into<String>, factory: F) -> Self
    where
        H: Any + Send + Sync,
        F: Fn(&QueryContext) -> H + Send + Sync + 'static,
    {
        self.factories.insert(
            handler.into(),
            Arc::new(move |context: &QueryContext| Arc::new(factory(context)) as HandlerInstance),
        );
        self
    }

    /// Register a shared instance
    pub fn instance<H: Any + Send + Sync>(mut self, handler: impl Into<String>, instance: H) -> Self {
        let instance: HandlerInstance = Arc::new(instance);
        self.factories
            .insert(handler.into(), Arc::new(move |_: &QueryContext| Arc::clone(&instance)));
        self
    }

    pub fn contains(&self, handler: &str) -> bool {
        self.factories.contains_key(handler)
    }
}

impl HandlerActivator for StaticActivator {
    fn activate(&self, handler: &str, context: &QueryContext) -> Option<HandlerInstance> {
        self.factories.get(handler).map(|factory| factory(context))
    }
}

impl fmt::Debug for StaticActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
