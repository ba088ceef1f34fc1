//! Controllers and their registry.
//!
//! # Responsibilities
//! - Define the controller contract invoked by the front controller
//! - Describe action outcomes (render, json, redirect, download)
//! - Map controller type names to constructors
//!
//! # Design Decisions
//! - Controllers are constructed per request with `(action, route)`
//! - Type lookup is an explicit registry, absence is a typed error
//! - Controllers are not shared across threads

pub mod registry;
pub mod result;

pub use registry::{ControllerArgs, ControllerFactory, ControllerRegistry};
pub use result::{ActionResult, Outcome};

use std::sync::Arc;

use thiserror::Error;

use crate::front::RequestContext;
use crate::inject::InjectError;
use crate::routing::RouteRule;

/// A request handler selected by route.
pub trait Controller {
    /// The action this instance was constructed for.
    fn action(&self) -> &str;

    /// The rule that selected this controller.
    fn route(&self) -> &Arc<RouteRule>;

    /// Run the action against the request.
    fn call_action(
        &mut self,
        request: &mut RequestContext,
    ) -> Result<ActionResult, ControllerError>;
}

/// Errors raised by controller actions.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The controller has no such action.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The request is malformed for this action.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A dependency could not be resolved.
    #[error(transparent)]
    Inject(#[from] InjectError),

    #[error("Internal error: {0}")]
    Internal(String),
}
