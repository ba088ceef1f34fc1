//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (RequestContext from method, URI, headers, body)
//!     → front::FrontController::dispatch (blocking pool)
//!     → response.rs (Output or DispatchError → Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
