//! Bundled application controllers.
//!
//! `home` serves the landing page and a CSV export, `users` is a complete
//! REST resource over an in-memory store. [`register`] installs both together
//! with the bindings they depend on.

pub mod home;
pub mod users;

use crate::inject::{Binder, Bindings, Scope};
use crate::resolver::ControllerResolver;

pub use home::HomeController;
pub use users::{User, UserStore, UsersController};

/// Register the bundled controllers and their dependencies.
pub fn register(resolver: &mut ControllerResolver, bindings: &mut Bindings) {
    resolver
        .register("home", |args| {
            Ok(Box::new(HomeController::new(
                args.action,
                args.route,
                args.injector.get::<UserStore>()?,
            )))
        })
        .register("users", |args| {
            Ok(Box::new(UsersController::new(
                args.action,
                args.route,
                args.injector.get::<UserStore>()?,
            )))
        });

    // The store outlives requests, so it is bound as a manual instance.
    bindings.bind(
        Binder::of::<UserStore>()
            .in_scope(Scope::Singleton)
            .to_instance(UserStore::new()),
    );
}
