//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route compiles (method names, URI patterns)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject bindings with unknown scopes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, RouteConfig};
use crate::inject::Scope;
use crate::routing::RouteTable;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate `config`, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new("listener.bind_address", "not a socket address"));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let prefix = &config.global.prefix_system;
    if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
        errors.push(ValidationError::new(
            "global.prefix_system",
            "must start with '/' and must not end with '/'",
        ));
    }
    if config.global.default_action.trim().is_empty() {
        errors.push(ValidationError::new("global.default_action", "must not be empty"));
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(e) = RouteTable::from_config(std::slice::from_ref(route)) {
            errors.push(ValidationError::new(format!("routes[{}]", index), e.to_string()));
        }
        if let RouteConfig::Rule { uri, .. } = route {
            if uri.is_empty() {
                errors.push(ValidationError::new(
                    format!("routes[{}].uri", index),
                    "must not be empty",
                ));
            }
        }
    }

    for (index, binding) in config.bindings.iter().enumerate() {
        if binding.name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("bindings[{}].name", index),
                "must not be empty",
            ));
        }
        if let Scope::Unsupported(scope) = &binding.scope {
            errors.push(ValidationError::new(
                format!("bindings[{}].scope", index),
                format!("unknown scope '{}'", scope),
            ));
        }
    }

    if config.session.enabled && config.session.cookie_name.trim().is_empty() {
        errors.push(ValidationError::new("session.cookie_name", "must not be empty"));
    }
    if config.session.enabled && config.session.ttl_secs == 0 {
        errors.push(ValidationError::new("session.ttl_secs", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new("observability.metrics_address", "not a socket address"));
    }
    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new("observability.log_format", "must be 'pretty' or 'json'"));
    }

    if config.admin.enabled {
        if config.admin.api_key.trim().is_empty() {
            errors.push(ValidationError::new("admin.api_key", "must not be empty"));
        }
        if config.admin.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new("admin.bind_address", "not a socket address"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BindingConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.global.prefix_system = "app/".into();
        config.routes.push(RouteConfig::rule("GET", "/ok", "home#index"));
        config.routes.push(RouteConfig::rule("FETCH ME", "/", "home#index"));
        config.bindings.push(BindingConfig {
            name: "Clock".into(),
            to: None,
            scope: Scope::from("BOGUS"),
        });

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["listener.bind_address", "global.prefix_system", "routes[1]", "bindings[0].scope"]
        );
    }

    #[test]
    fn test_admin_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.admin.api_key = String::new();
        assert!(validate_config(&config).is_ok());

        config.admin.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "admin.api_key");
    }

    #[test]
    fn test_session_ttl_must_be_positive() {
        let mut config = AppConfig::default();
        config.session.ttl_secs = 0;
        config.session.enabled = false;
        assert!(validate_config(&config).is_ok());

        config.session.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "session.ttl_secs");
    }
}
