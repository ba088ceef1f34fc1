//! Route table lookup.
//!
//! # Responsibilities
//! - Store rules in declaration order
//! - Look up the first rule matching a request
//! - Return the matched rule or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(n) scan in declaration order: first match wins
//! - Explicit NotMatched rather than a silent default

use std::sync::Arc;

use axum::http::Method;

use super::rule::{MethodSpec, RouteRule};
use super::RouteError;
use crate::config::{MethodConfig, RouteConfig};

/// Ordered collection of route rules.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<Arc<RouteRule>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from configuration, preserving declaration order.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RouteError> {
        let mut table = Self::new();
        for route in routes {
            match route {
                RouteConfig::Rule { method, uri, action } => {
                    let methods = parse_methods(method)?;
                    table.push(RouteRule::new(methods, uri.as_str(), action.as_str())?);
                }
                RouteConfig::Resource { resource } => {
                    table = table.resource(resource)?;
                }
                RouteConfig::AllowAll { allow_all, controller } => {
                    table = table.allow_all(allow_all, controller)?;
                }
            }
        }
        tracing::debug!(rules = table.len(), "Route table built");
        Ok(table)
    }

    /// Append an already built rule.
    pub fn push(&mut self, rule: RouteRule) {
        self.rules.push(Arc::new(rule));
    }

    pub fn add(
        mut self,
        method: impl Into<MethodSpec>,
        uri: &str,
        action: &str,
    ) -> Result<Self, RouteError> {
        self.push(RouteRule::new(method, uri, action)?);
        Ok(self)
    }

    pub fn get(self, uri: &str, action: &str) -> Result<Self, RouteError> {
        self.add(Method::GET, uri, action)
    }

    pub fn post(self, uri: &str, action: &str) -> Result<Self, RouteError> {
        self.add(Method::POST, uri, action)
    }

    pub fn put(self, uri: &str, action: &str) -> Result<Self, RouteError> {
        self.add(Method::PUT, uri, action)
    }

    pub fn patch(self, uri: &str, action: &str) -> Result<Self, RouteError> {
        self.add(Method::PATCH, uri, action)
    }

    pub fn delete(self, uri: &str, action: &str) -> Result<Self, RouteError> {
        self.add(Method::DELETE, uri, action)
    }

    /// Route every verb under `uri` to `controller`, leaving the action to
    /// the default. The rule is actionless, so `uri` also matches as a fragment.
    pub fn allow_all(self, uri: &str, controller: &str) -> Result<Self, RouteError> {
        self.add(MethodSpec::all(), uri, controller)
    }

    /// Standard REST routes for `name`.
    pub fn resource(self, name: &str) -> Result<Self, RouteError> {
        let base = format!("/{}", name.trim_matches('/'));
        let member = format!("{}/:id", base);
        let controller = name.trim_matches('/');
        let target = |action: &str| format!("{}#{}", controller, action);

        self.get(&base, &target("index"))?
            .get(&format!("{}/fresh", base), &target("fresh"))?
            .get(&format!("{}/edit", member), &target("edit"))?
            .get(&member, &target("show"))?
            .post(&base, &target("create"))?
            .put(&member, &target("update"))?
            .patch(&member, &target("update"))?
            .delete(&member, &target("destroy"))
    }

    /// Find the first rule matching `method` and `uri`.
    pub fn find(&self, method: &Method, uri: &str) -> Result<Arc<RouteRule>, RouteError> {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, uri))
            .cloned()
            .ok_or_else(|| RouteError::NotMatched {
                method: method.to_string(),
                uri: uri.to_string(),
            })
    }

    pub fn rules(&self) -> &[Arc<RouteRule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn parse_method(name: &str) -> Result<Method, RouteError> {
    Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| RouteError::InvalidMethod(name.to_string()))
}

pub(crate) fn parse_methods(config: &MethodConfig) -> Result<MethodSpec, RouteError> {
    match config {
        MethodConfig::One(name) if name == "*" => Ok(MethodSpec::all()),
        MethodConfig::One(name) => Ok(MethodSpec::One(parse_method(name)?)),
        MethodConfig::Many(names) => names
            .iter()
            .map(|name| parse_method(name))
            .collect::<Result<Vec<_>, _>>()
            .map(MethodSpec::AnyOf),
    }
}
