//! Controller type registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::Controller;
use crate::inject::{InjectError, Injector};
use crate::routing::RouteRule;

/// Constructor arguments handed to a controller factory.
pub struct ControllerArgs<'a> {
    /// Resolved action (route action or the configured default).
    pub action: String,
    /// The rule that matched the request.
    pub route: Arc<RouteRule>,
    /// Request-scoped injector for the controller's dependencies.
    pub injector: &'a Injector,
}

/// Builds a controller instance.
pub type ControllerFactory = Arc<
    dyn Fn(ControllerArgs<'_>) -> Result<Box<dyn Controller>, InjectError> + Send + Sync,
>;

/// Fully-qualified controller type name → factory.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(ControllerArgs<'_>) -> Result<Box<dyn Controller>, InjectError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(type_name.into(), Arc::new(factory));
    }

    pub fn get(&self, type_name: &str) -> Option<&ControllerFactory> {
        self.factories.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
