//! MVC request-dispatch core.
//!
//! Routes incoming requests through an ordered rule table to named
//! controllers, builds controllers and their dependencies through a small
//! injector, and hands action results to replaceable output collaborators.

pub mod admin;
pub mod config;
pub mod controller;
pub mod controllers;
pub mod front;
pub mod http;
pub mod inject;
pub mod lifecycle;
pub mod observability;
pub mod resolver;
pub mod routing;
pub mod session;

pub use config::AppConfig;
pub use controller::{ActionResult, Controller, ControllerError};
pub use front::{Dispatch, DispatchError, FrontController, RequestContext};
pub use http::HttpServer;
pub use inject::{Binder, Bindings, Injector, Scope};
pub use lifecycle::Shutdown;
pub use resolver::ControllerResolver;
pub use routing::{RouteRule, RouteTable};
