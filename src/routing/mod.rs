//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → table.rs (ordered rule scan)
//!     → rule.rs (method constraint, then URI pattern)
//!     → Return: matched RouteRule or NotMatched
//!
//! Route Compilation (at startup or reload):
//!     RouteConfig[]
//!     → Expand resources / allow_all entries
//!     → Compile URI patterns
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Rules compiled at build time, immutable at runtime
//! - Deterministic: same input always matches same rule
//! - First match wins (declaration order)

pub mod rule;
pub mod table;

pub use rule::{MethodSpec, RouteRule};
pub use table::RouteTable;

use thiserror::Error;

/// Errors raised while building or querying the route table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No rule matches the request.
    #[error("No route matches {method} {uri}")]
    NotMatched { method: String, uri: String },

    /// The URI cannot be compiled into a pattern.
    #[error("Invalid route pattern '{uri}': {source}")]
    InvalidPattern {
        uri: String,
        #[source]
        source: regex::Error,
    },

    /// Unknown HTTP method in configuration.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
}
