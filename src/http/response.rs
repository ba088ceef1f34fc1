//! Response construction.
//!
//! # Responsibilities
//! - Turn the collaborators' Output into an HTTP response
//! - Map dispatch errors to status codes
//! - Keep internal error details out of response bodies
//!
//! # Design Decisions
//! - Client errors (4xx) carry the error message
//! - Server errors (5xx) are logged with detail, answered generically

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::front::{DispatchError, Output};

/// Build the HTTP response for a successful dispatch.
pub fn output_response(output: Output) -> Response {
    let mut builder = Response::builder().status(output.status);
    for (name, value) in &output.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    match builder.body(Body::from(output.body)) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Controller produced an invalid response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Build the HTTP response for a failed dispatch.
pub fn error_response(err: &DispatchError, request_id: &str) -> Response {
    let status = err.status();
    match err {
        DispatchError::RouteNotMatched { method, uri } => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %uri,
                "No route matched"
            );
        }
        DispatchError::ControllerNotFound(type_name) => {
            tracing::error!(
                request_id = %request_id,
                controller = %type_name,
                "Controller does not exist"
            );
        }
        other if status.is_server_error() => {
            tracing::error!(request_id = %request_id, error = %other, "Dispatch failed");
        }
        other => {
            tracing::info!(
                request_id = %request_id,
                error = %other,
                status = %status,
                "Request rejected"
            );
        }
    }

    if status.is_server_error() {
        (status, "Internal Server Error").into_response()
    } else {
        (status, err.to_string()).into_response()
    }
}
