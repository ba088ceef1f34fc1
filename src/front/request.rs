//! Per-request context handed to controllers.

use std::collections::HashMap;

use axum::http::{header, HeaderMap, Method};

/// Form field that overrides the method of a POST.
pub const METHOD_OVERRIDE_FIELD: &str = "_method";

/// Everything a controller may read about the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation ID (from `x-request-id`).
    pub request_id: String,
    /// Method on the wire.
    pub raw_method: Method,
    /// Method used for routing, after `_method` override.
    pub method: Method,
    /// Request path without the query string; the front controller strips
    /// the configured prefix before routing.
    pub path: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    /// Values bound to `:name` placeholders of the matched rule.
    pub route_params: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub session_id: Option<String>,
    pub session: HashMap<String, String>,
}

impl RequestContext {
    /// Context for `method` and `uri` (path with optional query string).
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, parse_urlencoded(query.as_bytes())),
            None => (uri, HashMap::new()),
        };

        Self {
            request_id: String::new(),
            raw_method: method.clone(),
            method,
            path: path.to_string(),
            query,
            form: HashMap::new(),
            route_params: HashMap::new(),
            headers: HeaderMap::new(),
            body: Vec::new(),
            session_id: None,
            session: HashMap::new(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Attach the body; url-encoded forms are parsed and may override the method.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        let is_form = self
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        if is_form {
            self.form = parse_urlencoded(&body);
        }
        self.body = body;
        self.apply_method_override();
        self
    }

    /// Attach already decoded form fields.
    pub fn with_form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.form
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.apply_method_override();
        self
    }

    fn apply_method_override(&mut self) {
        if self.raw_method != Method::POST {
            return;
        }
        let overridden = self
            .form
            .get(METHOD_OVERRIDE_FIELD)
            .map(|name| name.to_ascii_uppercase());
        self.method = match overridden.as_deref() {
            Some("PUT") => Method::PUT,
            Some("PATCH") => Method::PATCH,
            Some("DELETE") => Method::DELETE,
            _ => Method::POST,
        };
    }

    /// Request parameter: route placeholders first, then form, then query.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route_params
            .get(name)
            .or_else(|| self.form.get(name))
            .or_else(|| self.query.get(name))
            .map(String::as_str)
    }

    /// Cookie value sent by the client.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

fn parse_urlencoded(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}
