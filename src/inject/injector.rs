//! Request-scoped injector.

use std::any::{type_name, Any};
use std::sync::Arc;

use super::{Bindings, Dependencies, InjectError, Instance, InstanceRepository};

/// Shared bindings paired with a private singleton cache.
///
/// One injector is created per dispatched request; its singletons are dropped
/// with it. The injector is `Send` but not `Sync`.
pub struct Injector {
    bindings: Arc<Bindings>,
    repository: InstanceRepository,
}

impl Injector {
    pub fn new(bindings: Arc<Bindings>) -> Self {
        Self {
            bindings,
            repository: InstanceRepository::new(),
        }
    }

    fn dependencies(&self) -> Dependencies<'_> {
        Dependencies::new(&self.bindings, &self.repository)
    }

    pub fn get_instance(&self, class_name: &str) -> Result<Instance, InjectError> {
        self.dependencies().get_instance(class_name)
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Result<Arc<T>, InjectError> {
        self.get_named(type_name::<T>())
    }

    pub fn get_named<T: Any + Send + Sync>(&self, class_name: &str) -> Result<Arc<T>, InjectError> {
        self.dependencies().get_named(class_name)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn repository(&self) -> &InstanceRepository {
        &self.repository
    }
}
