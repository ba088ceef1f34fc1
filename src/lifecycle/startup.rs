//! Startup orchestration.
//!
//! # Responsibilities
//! - Compile the configured route table
//! - Merge configured bindings into the application's constructors
//! - Select the session initializer
//! - Assemble the front controller
//!
//! # Design Decisions
//! - Fail fast: an invalid route aborts startup
//! - Controllers and constructors are registered in code, bindings in config

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::AppConfig;
use crate::front::FrontController;
use crate::inject::Bindings;
use crate::resolver::ControllerResolver;
use crate::routing::{RouteError, RouteTable};
use crate::session::{CookieSessionInitializer, SessionStore};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid route table: {0}")]
    Routes(#[from] RouteError),

    #[error("Controller namespace mismatch: resolver uses '{resolver}', config names '{config}'")]
    Namespace { resolver: String, config: String },
}

/// Build the front controller for `config`.
///
/// `resolver` must use the configured controller namespace; `bindings` holds
/// the application's constructors and code-level bindings, which configured
/// bindings override.
pub fn build_front_controller(
    config: &AppConfig,
    resolver: ControllerResolver,
    mut bindings: Bindings,
) -> Result<FrontController, StartupError> {
    if resolver.namespace() != config.global.controller_namespace {
        return Err(StartupError::Namespace {
            resolver: resolver.namespace().to_string(),
            config: config.global.controller_namespace.clone(),
        });
    }

    let routes = RouteTable::from_config(&config.routes)?;
    bindings.apply_config(&config.bindings);

    for rule in routes.rules().iter().filter(|rule| !resolver.contains(rule.controller())) {
        tracing::warn!(
            route = %rule,
            controller = %resolver.type_name(rule.controller()),
            "Route targets an unregistered controller"
        );
    }

    tracing::info!(
        rules = routes.len(),
        controllers = resolver.registry().type_names().len(),
        bindings = config.bindings.len(),
        "Front controller assembled"
    );

    let mut front = FrontController::new(config.global.clone(), routes, resolver, bindings);
    if config.session.enabled {
        let store = SessionStore::new(Duration::from_secs(config.session.ttl_secs));
        let sessions = CookieSessionInitializer::new(store, &config.session);
        front = front.with_session(Arc::new(sessions));
    }
    Ok(front)
}
