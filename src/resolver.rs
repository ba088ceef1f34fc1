//! Controller resolution.
//!
//! # Responsibilities
//! - Derive the controller type name from a rule's controller token
//! - Look the type up in the registry
//! - Construct it with the resolved action and the matched rule
//!
//! # Design Decisions
//! - Naming convention: `<namespace><PascalCase token>Controller`
//! - A missing type fails immediately, there is no fallback controller

use std::sync::Arc;

use crate::controller::{Controller, ControllerArgs, ControllerRegistry};
use crate::front::DispatchError;
use crate::inject::{InjectError, Injector};
use crate::routing::RouteRule;

/// Namespace prefix used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "\\Controller\\";

/// Maps matched rules to controller instances.
#[derive(Debug, Clone)]
pub struct ControllerResolver {
    namespace: String,
    registry: ControllerRegistry,
}

impl Default for ControllerResolver {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl ControllerResolver {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            registry: ControllerRegistry::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Fully-qualified type name for a controller token.
    pub fn type_name(&self, token: &str) -> String {
        format!("{}{}Controller", self.namespace, underscore_to_camel_case(token))
    }

    /// Register a controller under the type name derived from `token`.
    pub fn register<F>(&mut self, token: &str, factory: F) -> &mut Self
    where
        F: Fn(ControllerArgs<'_>) -> Result<Box<dyn Controller>, InjectError>
            + Send
            + Sync
            + 'static,
    {
        let type_name = self.type_name(token);
        tracing::debug!(token, type_name = %type_name, "Controller registered");
        self.registry.register(type_name, factory);
        self
    }

    /// Register a controller under an explicit type name.
    pub fn register_type<F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(ControllerArgs<'_>) -> Result<Box<dyn Controller>, InjectError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register(type_name, factory);
        self
    }

    /// Returns true if a controller is registered for `token`.
    pub fn contains(&self, token: &str) -> bool {
        self.registry.contains(&self.type_name(token))
    }

    /// Construct the controller targeted by `rule`.
    pub fn resolve(
        &self,
        rule: &Arc<RouteRule>,
        action: &str,
        injector: &Injector,
    ) -> Result<Box<dyn Controller>, DispatchError> {
        let type_name = self.type_name(rule.controller());
        let factory = self
            .registry
            .get(&type_name)
            .ok_or_else(|| DispatchError::ControllerNotFound(type_name.clone()))?;

        tracing::trace!(controller = %type_name, action, "Constructing controller");
        let controller = factory(ControllerArgs {
            action: action.to_string(),
            route: rule.clone(),
            injector,
        })?;
        Ok(controller)
    }
}

/// `user_profile` → `UserProfile`. Only the first letter of each word changes.
pub fn underscore_to_camel_case(token: &str) -> String {
    token
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
