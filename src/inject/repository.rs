//! Instance repository.
//!
//! # Responsibilities
//! - Apply the binder's scope to a resolution
//! - Cache singleton instances by effective class name
//! - Detect a singleton re-entering its own construction
//!
//! # Design Decisions
//! - Single-threaded: interior mutability via `RefCell`, the type is not `Sync`
//! - No borrow is held while a factory runs, so factories may resolve recursively
//! - The cache is written only after a successful construction

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{Binder, InjectError, Instance, Scope};

/// Builds instances for class names.
pub trait InstanceFactory {
    /// Construct `class_name`. The repository is handed over so that
    /// constructor dependencies can be resolved through it.
    fn create_instance(
        &self,
        repository: &InstanceRepository,
        class_name: &str,
    ) -> Result<Instance, InjectError>;
}

/// Singleton cache of one injector.
#[derive(Default)]
pub struct InstanceRepository {
    instances: RefCell<HashMap<String, Instance>>,
    resolving: RefCell<HashSet<String>>,
}

impl InstanceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `binder` using `factory` for any construction.
    pub fn get_instance<F>(&self, factory: &F, binder: &Binder) -> Result<Instance, InjectError>
    where
        F: InstanceFactory + ?Sized,
    {
        if let Some(instance) = binder.instance() {
            return Ok(instance.clone());
        }

        let class_name = binder.effective_class_name();
        match binder.scope() {
            Scope::Singleton => self.singleton_instance(factory, class_name),
            Scope::Prototype => factory.create_instance(self, class_name),
            Scope::Unsupported(scope) => Err(InjectError::UnsupportedScope(scope.clone())),
        }
    }

    /// Cached instance of `class_name`, constructed on first use.
    pub fn singleton_instance<F>(
        &self,
        factory: &F,
        class_name: &str,
    ) -> Result<Instance, InjectError>
    where
        F: InstanceFactory + ?Sized,
    {
        let cached = self.instances.borrow().get(class_name).cloned();
        if let Some(instance) = cached {
            return Ok(instance);
        }

        if !self.resolving.borrow_mut().insert(class_name.to_string()) {
            return Err(InjectError::CircularDependency(class_name.to_string()));
        }
        let created = factory.create_instance(self, class_name);
        self.resolving.borrow_mut().remove(class_name);

        let instance = created?;
        self.instances
            .borrow_mut()
            .insert(class_name.to_string(), instance.clone());
        tracing::trace!(class_name, "Singleton cached");
        Ok(instance)
    }

    /// Returns true if a singleton of `class_name` is cached.
    pub fn contains(&self, class_name: &str) -> bool {
        self.instances.borrow().contains_key(class_name)
    }

    /// Number of cached singletons.
    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }
}
