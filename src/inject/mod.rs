//! Dependency injection subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     BindingConfig[] + registered constructors
//!     → Bindings (immutable, shared via Arc)
//!
//! Per request:
//!     Injector::new(bindings)            (fresh InstanceRepository)
//!     → Bindings::binder(name)           (explicit or default binder)
//!     → InstanceRepository::get_instance (pre-built / singleton / prototype)
//!     → Bindings::create_instance        (constructor, recursive deps)
//! ```
//!
//! # Design Decisions
//! - Class names are plain strings; typed lookups use `std::any::type_name`
//! - The repository is single-threaded (`RefCell`) and lives with its injector
//! - Construction errors propagate unchanged

pub mod binder;
pub mod bindings;
pub mod injector;
pub mod repository;
pub mod scope;

pub use binder::{Binder, Instance};
pub use bindings::{Bindings, Dependencies};
pub use injector::Injector;
pub use repository::{InstanceFactory, InstanceRepository};
pub use scope::Scope;

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

/// Errors raised while resolving instances.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InjectError {
    /// The binder names a scope the repository does not handle.
    #[error("Unknown scope: {0}")]
    UnsupportedScope(String),

    /// No constructor is registered for the class name.
    #[error("No constructor registered for {0}")]
    MissingConstructor(String),

    /// The resolved instance is not of the requested type.
    #[error("Instance bound to {class_name} is not a {expected}")]
    TypeMismatch { class_name: String, expected: String },

    /// A singleton depends on itself while being constructed.
    #[error("Circular dependency while constructing {0}")]
    CircularDependency(String),
}

/// Downcast a resolved instance to a concrete type.
pub(crate) fn downcast<T: Any + Send + Sync>(
    instance: Instance,
    class_name: &str,
) -> Result<Arc<T>, InjectError> {
    instance
        .downcast::<T>()
        .map_err(|_| InjectError::TypeMismatch {
            class_name: class_name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })
}
