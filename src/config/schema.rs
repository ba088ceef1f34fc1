//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the application.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::inject::Scope;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Framework-wide settings (URL prefix, default action, controller namespace).
    pub global: GlobalConfig,

    /// Route table, in matching order.
    pub routes: Vec<RouteConfig>,

    /// Dependency bindings.
    pub bindings: Vec<BindingConfig>,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Framework-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// URL prefix the application is mounted under (e.g., "/app").
    pub prefix_system: String,

    /// Action used when a route names only a controller.
    pub default_action: String,

    /// Prefix of every controller type name.
    pub controller_namespace: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            prefix_system: String::new(),
            default_action: "index".to_string(),
            controller_namespace: crate::resolver::DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// A single verb or a set of verbs.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MethodConfig {
    One(String),
    Many(Vec<String>),
}

/// One entry of the route table.
///
/// ```toml
/// [[routes]]
/// method = "GET"
/// uri = "/users/:id"
/// action = "users#show"
///
/// [[routes]]
/// resource = "posts"
///
/// [[routes]]
/// allow_all = "/api"
/// controller = "api"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RouteConfig {
    /// A single rule.
    Rule {
        method: MethodConfig,
        uri: String,
        action: String,
    },
    /// Standard REST routes for a controller.
    Resource { resource: String },
    /// Every verb under a URI, routed to a controller's default action.
    AllowAll { allow_all: String, controller: String },
}

impl RouteConfig {
    pub fn rule(method: &str, uri: &str, action: &str) -> Self {
        RouteConfig::Rule {
            method: MethodConfig::One(method.to_string()),
            uri: uri.to_string(),
            action: action.to_string(),
        }
    }
}

/// Dependency binding.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BindingConfig {
    /// Requested class name.
    pub name: String,

    /// Class name actually constructed.
    #[serde(default)]
    pub to: Option<String>,

    /// Lifecycle scope (default: prototype).
    #[serde(default)]
    pub scope: Scope,
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Start a session for every request.
    pub enabled: bool,

    /// Cookie carrying the session ID.
    pub cookie_name: String,

    /// Idle time after which a session expires, in seconds.
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cookie_name: "session_id".to_string(),
            ttl_secs: 1800,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
