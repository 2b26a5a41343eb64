//! Handler and operation registration
//!
//! Hosts describe their handler types explicitly: each [`HandlerType`] lists
//! its operations, and each [`OperationSpec`] carries a typed adapter that
//! reads its arguments and calls into the live handler instance.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::descriptor::ParameterDescriptor;
use crate::binder::Arguments;
use crate::executor::QueryResult;

/// Live handler instance produced by a [`HandlerActivator`](crate::executor::HandlerActivator)
pub type HandlerInstance = Arc<dyn Any + Send + Sync>;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Outcome of calling an operation adapter
pub enum Invocation {
    /// Synchronous result
    Ready(anyhow::Result<QueryResult>),
    /// Asynchronous result, awaited by the executor
    Pending(BoxFuture<anyhow::Result<QueryResult>>),
}

impl Invocation {
    pub async fn resolve(self) -> anyhow::Result<QueryResult> {
        match self {
            Invocation::Ready(result) => result,
            Invocation::Pending(future) => future.await,
        }
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Ready(_) => f.write_str("Invocation::Ready"),
            Invocation::Pending(_) => f.write_str("Invocation::Pending"),
        }
    }
}

/// Calls an operation on a handler instance; `None` when the instance is
/// not of the handler type the operation was declared for
pub(crate) type Invoker = Arc<dyn Fn(HandlerInstance, Arguments) -> Option<Invocation> + Send + Sync>;

/// Declaration of one operation of a handler type
pub struct OperationSpec {
    pub(crate) name: Option<String>,
    pub(crate) route: Option<String>,
    pub(crate) ignored: bool,
    pub(crate) parameters: Vec<ParameterDescriptor>,
    pub(crate) invoker: Option<Invoker>,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::unnamed()
        }
    }

    /// An operation without a query name; never part of a catalog
    pub fn unnamed() -> Self {
        Self {
            name: None,
            route: None,
            ignored: false,
            parameters: Vec::new(),
            invoker: None,
        }
    }

    /// Route template relative to the handler route
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Exclude the operation from every catalog
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(mut self, parameters: impl IntoIterator<Item = ParameterDescriptor>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Synchronous adapter
    pub fn handle<H, F>(mut self, handle: F) -> Self
    where
        H: Any + Send + Sync,
        F: Fn(&H, &Arguments) -> anyhow::Result<QueryResult> + Send + Sync + 'static,
    {
        self.invoker = Some(Arc::new(move |instance: HandlerInstance, arguments: Arguments| {
            let handler = instance.downcast::<H>().ok()?;
            Some(Invocation::Ready(handle(&handler, &arguments)))
        }));
        self
    }

    /// Asynchronous adapter
    pub fn handle_async<H, F, Fut>(mut self, handle: F) -> Self
    where
        H: Any + Send + Sync,
        F: Fn(Arc<H>, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<QueryResult>> + Send + 'static,
    {
        self.invoker = Some(Arc::new(move |instance: HandlerInstance, arguments: Arguments| {
            let handler = instance.downcast::<H>().ok()?;
            Some(Invocation::Pending(Box::pin(handle(handler, arguments))))
        }));
        self
    }
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("route", &self.route)
            .field("ignored", &self.ignored)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Declaration of a handler type and its operations
#[derive(Debug)]
pub struct HandlerType {
    pub(crate) name: String,
    pub(crate) module: Option<String>,
    pub(crate) route: Option<String>,
    pub(crate) ignored: bool,
    pub(crate) operations: Vec<OperationSpec>,
}

impl HandlerType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            route: None,
            ignored: false,
            operations: Vec::new(),
        }
    }

    /// Module (library) the handler belongs to, matched by module filters
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Route template; `[controller]` is replaced by the handler name
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Exclude all operations of this handler
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn operation(mut self, operation: OperationSpec) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
