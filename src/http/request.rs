//! Request intake.
//!
//! # Responsibilities
//! - Read the body within the configured size limit
//! - Carry the request ID set by the request-id middleware
//! - Build the RequestContext handed to the front controller
//!
//! # Design Decisions
//! - Request ID added by middleware as early as possible for tracing
//! - The full path and query string are kept; prefix stripping belongs to routing

use axum::body::Body;
use axum::http::Request;

use crate::front::RequestContext;

/// Header carrying the correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Error reading the request body.
#[derive(Debug, thiserror::Error)]
#[error("Request body exceeds {limit} bytes or could not be read")]
pub struct BodyError {
    pub limit: usize,
}

/// Correlation ID of `request`, or "unknown".
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Convert an HTTP request into a dispatchable context.
pub async fn into_context(
    request: Request<Body>,
    limit: usize,
) -> Result<RequestContext, BodyError> {
    let request_id = request_id(&request);
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| BodyError { limit })?;

    let uri = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Ok(RequestContext::new(parts.method.clone(), uri)
        .with_request_id(request_id)
        .with_headers(parts.headers)
        .with_body(bytes.to_vec()))
}
