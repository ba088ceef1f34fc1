//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all dispatch handler
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener with graceful shutdown
//! - Hand every request to the front controller
//! - Record per-request metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::front::{DispatchError, FrontController};
use crate::http::request::{into_context, request_id};
use crate::http::response::{error_response, output_response};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub front: Arc<FrontController>,
    pub config: Arc<AppConfig>,
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, front: FrontController) -> Self {
        let state = AppState {
            front: Arc::new(front),
            config: Arc::new(config),
        };
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The application router (for embedding or in-process testing).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Admin API router, when enabled in configuration.
    pub fn admin_router(&self) -> Option<Router> {
        if self.state.config.admin.enabled {
            Some(crate::admin::setup_admin_router(self.state.clone()))
        } else {
            None
        }
    }

    pub fn front(&self) -> Arc<FrontController> {
        self.state.front.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.state.front.routes().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main dispatch handler.
/// Builds the request context and runs the front controller off the async workers.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);

    let context = match into_context(request, state.config.listener.max_body_bytes).await {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response();
        }
    };
    let method = context.method.to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %context.path,
        "Dispatching request"
    );

    let front = state.front.clone();
    let outcome = tokio::task::spawn_blocking(move || front.dispatch(context)).await;

    match outcome {
        Ok(Ok(dispatch)) => {
            let status = dispatch.output.status.as_u16();
            tracing::debug!(
                request_id = %request_id,
                controller = %dispatch.controller,
                action = %dispatch.action,
                result = dispatch.result.outcome.kind(),
                status,
                "Request dispatched"
            );
            metrics::record_request(&method, status, &dispatch.controller, start_time);
            output_response(dispatch.output)
        }
        Ok(Err(err)) => {
            if let DispatchError::RouteNotMatched { .. } = err {
                metrics::record_route_miss(&method);
            }
            metrics::record_request(&method, err.status().as_u16(), "none", start_time);
            error_response(&err, &request_id)
        }
        Err(join_error) => {
            tracing::error!(request_id = %request_id, error = %join_error, "Dispatch task failed");
            metrics::record_request(&method, 500, "none", start_time);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
