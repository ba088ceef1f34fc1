//! Binding registry and constructor-backed factory.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{downcast, Binder, InjectError, Instance, InstanceFactory, InstanceRepository};
use crate::config::BindingConfig;

/// Builds an instance, resolving its dependencies through [`Dependencies`].
pub type Constructor =
    Arc<dyn Fn(&Dependencies<'_>) -> Result<Instance, InjectError> + Send + Sync>;

/// Binders by requested name and constructors by concrete class name.
#[derive(Clone, Default)]
pub struct Bindings {
    binders: HashMap<String, Binder>,
    constructors: HashMap<String, Constructor>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the binder for its class name.
    pub fn bind(&mut self, binder: Binder) -> &mut Self {
        self.binders.insert(binder.class_name().to_string(), binder);
        self
    }

    /// Apply configured bindings on top of the registered ones.
    pub fn apply_config(&mut self, bindings: &[BindingConfig]) -> &mut Self {
        for entry in bindings {
            let mut binder = Binder::new(entry.name.as_str()).in_scope(entry.scope.clone());
            if let Some(to) = &entry.to {
                binder = binder.to(to.as_str());
            }
            tracing::debug!(name = %entry.name, scope = %entry.scope, "Binding configured");
            self.bind(binder);
        }
        self
    }

    /// Binder for `class_name`; unbound names get a prototype binder.
    pub fn binder(&self, class_name: &str) -> Binder {
        self.binders
            .get(class_name)
            .cloned()
            .unwrap_or_else(|| Binder::new(class_name))
    }

    /// Register a constructor for `T` under its type name.
    pub fn constructor<T, F>(&mut self, build: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Dependencies<'_>) -> Result<T, InjectError> + Send + Sync + 'static,
    {
        self.constructor_named(type_name::<T>(), build)
    }

    /// Register a constructor under an explicit class name.
    pub fn constructor_named<T, F>(&mut self, class_name: impl Into<String>, build: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Dependencies<'_>) -> Result<T, InjectError> + Send + Sync + 'static,
    {
        let constructor: Constructor = Arc::new(move |deps: &Dependencies<'_>| {
            build(deps).map(|value| Arc::new(value) as Instance)
        });
        self.constructors.insert(class_name.into(), constructor);
        self
    }

    pub fn has_constructor(&self, class_name: &str) -> bool {
        self.constructors.contains_key(class_name)
    }
}

impl InstanceFactory for Bindings {
    fn create_instance(
        &self,
        repository: &InstanceRepository,
        class_name: &str,
    ) -> Result<Instance, InjectError> {
        let constructor = self
            .constructors
            .get(class_name)
            .ok_or_else(|| InjectError::MissingConstructor(class_name.to_string()))?;
        tracing::trace!(class_name, "Constructing instance");
        constructor(&Dependencies::new(self, repository))
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut constructors: Vec<&String> = self.constructors.keys().collect();
        constructors.sort();
        f.debug_struct("Bindings")
            .field("binders", &self.binders)
            .field("constructors", &constructors)
            .finish()
    }
}

/// Resolution handle passed to constructors.
pub struct Dependencies<'a> {
    bindings: &'a Bindings,
    repository: &'a InstanceRepository,
}

impl<'a> Dependencies<'a> {
    pub(crate) fn new(bindings: &'a Bindings, repository: &'a InstanceRepository) -> Self {
        Self { bindings, repository }
    }

    /// Resolve `class_name` through its binder.
    pub fn get_instance(&self, class_name: &str) -> Result<Instance, InjectError> {
        let binder = self.bindings.binder(class_name);
        self.repository.get_instance(self.bindings, &binder)
    }

    /// Resolve `T` by its own type name.
    pub fn get<T: Any + Send + Sync>(&self) -> Result<Arc<T>, InjectError> {
        self.get_named(type_name::<T>())
    }

    /// Resolve `class_name` and downcast it to `T`.
    pub fn get_named<T: Any + Send + Sync>(&self, class_name: &str) -> Result<Arc<T>, InjectError> {
        downcast(self.get_instance(class_name)?, class_name)
    }
}
