//! Front controller.
//!
//! # Data Flow
//! ```text
//! RequestContext (method, path, params, cookies)
//!     → SessionInitializer::start_session
//!     → strip prefix_system from the path
//!     → RouteTable::find (first matching rule)
//!     → action = rule action or global.default_action
//!     → Injector::new (fresh singleton cache for this request)
//!     → ControllerResolver::resolve
//!     → Controller::call_action
//!     → SessionInitializer::save_session
//!     → HeaderSender / OutputDisplayer / RedirectHandler / DownloadHandler
//!     → Dispatch (Output + what ran)
//! ```
//!
//! # Design Decisions
//! - One request is dispatched start to finish on one thread
//! - The route table is swapped whole on reload, never mutated
//! - Errors surface immediately; nothing is retried

pub mod output;
pub mod request;

pub use output::{
    DownloadHandler, HeaderSender, HttpDownloadHandler, HttpHeaderSender, HttpOutputDisplayer,
    HttpRedirectHandler, NoSession, Output, OutputDisplayer, RedirectHandler, SessionInitializer,
};
pub use request::RequestContext;

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::StatusCode;
use thiserror::Error;

use crate::config::GlobalConfig;
use crate::controller::{ActionResult, ControllerError, Outcome};
use crate::inject::{Bindings, InjectError, Injector};
use crate::resolver::ControllerResolver;
use crate::routing::{RouteError, RouteRule, RouteTable};

/// Errors that abort a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No rule matches the request.
    #[error("No route matches {method} {uri}")]
    RouteNotMatched { method: String, uri: String },

    /// The controller type derived from the rule is not registered.
    #[error("Controller does not exist: {0}")]
    ControllerNotFound(String),

    /// Controller construction failed.
    #[error(transparent)]
    Inject(#[from] InjectError),

    /// The action failed.
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// The route table could not be queried.
    #[error(transparent)]
    Route(RouteError),
}

impl From<RouteError> for DispatchError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotMatched { method, uri } => {
                DispatchError::RouteNotMatched { method, uri }
            }
            other => DispatchError::Route(other),
        }
    }
}

impl DispatchError {
    /// HTTP status reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::RouteNotMatched { .. } => StatusCode::NOT_FOUND,
            DispatchError::Controller(ControllerError::UnknownAction(_)) => StatusCode::NOT_FOUND,
            DispatchError::Controller(ControllerError::NotFound(_)) => StatusCode::NOT_FOUND,
            DispatchError::Controller(ControllerError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Replaceable side-effect handlers of the front controller.
#[derive(Clone)]
pub struct Collaborators {
    pub session: Arc<dyn SessionInitializer>,
    pub header_sender: Arc<dyn HeaderSender>,
    pub output_displayer: Arc<dyn OutputDisplayer>,
    pub redirect_handler: Arc<dyn RedirectHandler>,
    pub download_handler: Arc<dyn DownloadHandler>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            session: Arc::new(NoSession),
            header_sender: Arc::new(HttpHeaderSender),
            output_displayer: Arc::new(HttpOutputDisplayer),
            redirect_handler: Arc::new(HttpRedirectHandler),
            download_handler: Arc::new(HttpDownloadHandler),
        }
    }
}

/// Record of a completed dispatch.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// Fully-qualified controller type name.
    pub controller: String,
    pub action: String,
    pub route: Arc<RouteRule>,
    pub result: ActionResult,
    pub output: Output,
}

/// Drives a request from routing to output.
pub struct FrontController {
    global: GlobalConfig,
    routes: ArcSwap<RouteTable>,
    resolver: ControllerResolver,
    bindings: Arc<Bindings>,
    collaborators: Collaborators,
}

impl FrontController {
    pub fn new(
        global: GlobalConfig,
        routes: RouteTable,
        resolver: ControllerResolver,
        bindings: Bindings,
    ) -> Self {
        Self {
            global,
            routes: ArcSwap::from_pointee(routes),
            resolver,
            bindings: Arc::new(bindings),
            collaborators: Collaborators::default(),
        }
    }

    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    pub fn with_session(mut self, session: Arc<dyn SessionInitializer>) -> Self {
        self.collaborators.session = session;
        self
    }

    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    pub fn resolver(&self) -> &ControllerResolver {
        &self.resolver
    }

    /// Current route table.
    pub fn routes(&self) -> Arc<RouteTable> {
        self.routes.load_full()
    }

    /// Replace the route table; in-flight dispatches keep the old one.
    pub fn reload_routes(&self, routes: RouteTable) {
        tracing::info!(rules = routes.len(), "Route table reloaded");
        self.routes.store(Arc::new(routes));
    }

    /// Route, resolve and run the controller for `request`.
    pub fn dispatch(&self, mut request: RequestContext) -> Result<Dispatch, DispatchError> {
        let _span = tracing::debug_span!(
            "dispatch",
            request_id = %request.request_id,
            method = %request.method,
        )
        .entered();

        let mut output = Output::default();
        self.collaborators.session.start_session(&mut request, &mut output);

        request.path = self.strip_prefix(&request.path).to_string();
        let routes = self.routes.load();
        let rule = routes.find(&request.method, &request.path)?;
        let action = rule
            .action()
            .unwrap_or(self.global.default_action.as_str())
            .to_string();
        request.route_params = rule.parameters(&request.path);

        let controller_type = self.resolver.type_name(rule.controller());
        tracing::debug!(
            path = %request.path,
            route = %rule,
            controller = %controller_type,
            action = %action,
            "Route matched"
        );

        let injector = Injector::new(self.bindings.clone());
        let mut controller = self.resolver.resolve(&rule, &action, &injector)?;
        let result = controller.call_action(&mut request)?;

        self.collaborators.session.save_session(&request);
        self.emit(&result, &mut output);

        Ok(Dispatch {
            controller: controller_type,
            action,
            route: rule,
            result,
            output,
        })
    }

    fn emit(&self, result: &ActionResult, output: &mut Output) {
        let c = &self.collaborators;
        c.header_sender.send(&result.headers, output);

        match &result.outcome {
            Outcome::Render { content, status, .. } => {
                c.output_displayer
                    .display(*status, "text/html; charset=utf-8", content.as_bytes(), output);
            }
            Outcome::Json { value, status } => {
                c.output_displayer
                    .display(*status, "application/json", value.to_string().as_bytes(), output);
            }
            Outcome::Redirect { location } => {
                c.redirect_handler.redirect(&self.add_prefix(location), output);
            }
            Outcome::Download {
                file_name,
                content_type,
                content,
            } => {
                c.download_handler
                    .stream_file(file_name, content_type, content, output);
            }
            Outcome::NoContent => {
                c.output_displayer.display(StatusCode::NO_CONTENT, "", &[], output);
            }
        }
    }

    fn strip_prefix<'a>(&self, path: &'a str) -> &'a str {
        strip_prefix(&self.global.prefix_system, path)
    }

    fn add_prefix(&self, location: &str) -> String {
        let prefix = self.global.prefix_system.as_str();
        let already_prefixed =
            location == prefix || location.starts_with(&format!("{}/", prefix));
        if prefix.is_empty() || !location.starts_with('/') || already_prefixed {
            location.to_string()
        } else {
            format!("{}{}", prefix, location)
        }
    }
}

/// Remove `prefix` from `path` when it is a leading path segment.
pub fn strip_prefix<'a>(prefix: &str, path: &'a str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}
