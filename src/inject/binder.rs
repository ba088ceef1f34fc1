//! Binding records.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use super::Scope;

/// A resolved object.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Describes how a requested class name is resolved.
#[derive(Clone)]
pub struct Binder {
    class_name: String,
    bound_class_name: Option<String>,
    scope: Scope,
    instance: Option<Instance>,
}

impl Binder {
    /// Unbound, prototype-scoped binder for `class_name`.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            bound_class_name: None,
            scope: Scope::default(),
            instance: None,
        }
    }

    /// Binder keyed by the type name of `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self::new(type_name::<T>())
    }

    /// Resolve to another class name.
    pub fn to(mut self, bound_class_name: impl Into<String>) -> Self {
        self.bound_class_name = Some(bound_class_name.into());
        self
    }

    /// Resolve to the type name of `T`.
    pub fn to_type<T: ?Sized>(self) -> Self {
        self.to(type_name::<T>())
    }

    pub fn in_scope(mut self, scope: impl Into<Scope>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Always resolve to `instance`, whatever the scope.
    pub fn to_instance<T: Any + Send + Sync>(mut self, instance: T) -> Self {
        self.instance = Some(Arc::new(instance));
        self
    }

    /// Always resolve to an already shared instance.
    pub fn to_shared(mut self, instance: Instance) -> Self {
        self.instance = Some(instance);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn bound_class_name(&self) -> Option<&str> {
        self.bound_class_name.as_deref()
    }

    /// Bound class name if set, else the requested one.
    pub fn effective_class_name(&self) -> &str {
        self.bound_class_name.as_deref().unwrap_or(&self.class_name)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("class_name", &self.class_name)
            .field("bound_class_name", &self.bound_class_name)
            .field("scope", &self.scope)
            .field("instance", &self.instance.is_some())
            .finish()
    }
}
