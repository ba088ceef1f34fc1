//! Response output and the collaborators that produce it.
//!
//! The front controller never builds HTTP responses itself: it hands each
//! action outcome to a collaborator, which writes into an [`Output`]. Tests
//! swap the collaborators for recording doubles.

use axum::http::{header, StatusCode};

use super::RequestContext;

/// Response under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Output {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn push_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }
}

/// Starts and persists the session of a request.
pub trait SessionInitializer: Send + Sync {
    /// Load (or create) the session before routing.
    fn start_session(&self, request: &mut RequestContext, output: &mut Output);

    /// Persist session changes after the action ran.
    fn save_session(&self, _request: &RequestContext) {}
}

/// Emits headers set by an action.
pub trait HeaderSender: Send + Sync {
    fn send(&self, headers: &[(String, String)], output: &mut Output);
}

/// Writes rendered content.
pub trait OutputDisplayer: Send + Sync {
    fn display(&self, status: StatusCode, content_type: &str, content: &[u8], output: &mut Output);
}

/// Sends the client elsewhere.
pub trait RedirectHandler: Send + Sync {
    fn redirect(&self, location: &str, output: &mut Output);
}

/// Streams a file to the client.
pub trait DownloadHandler: Send + Sync {
    fn stream_file(&self, file_name: &str, content_type: &str, content: &[u8], output: &mut Output);
}

/// Session initializer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSession;

impl SessionInitializer for NoSession {
    fn start_session(&self, _request: &mut RequestContext, _output: &mut Output) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HttpHeaderSender;

impl HeaderSender for HttpHeaderSender {
    fn send(&self, headers: &[(String, String)], output: &mut Output) {
        output.headers.extend(headers.iter().cloned());
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HttpOutputDisplayer;

impl OutputDisplayer for HttpOutputDisplayer {
    fn display(&self, status: StatusCode, content_type: &str, content: &[u8], output: &mut Output) {
        output.status = status;
        if !content.is_empty() {
            output.push_header(header::CONTENT_TYPE.as_str(), content_type);
        }
        output.body = content.to_vec();
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HttpRedirectHandler;

impl RedirectHandler for HttpRedirectHandler {
    fn redirect(&self, location: &str, output: &mut Output) {
        output.status = StatusCode::FOUND;
        output.push_header(header::LOCATION.as_str(), location);
        output.body.clear();
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HttpDownloadHandler;

impl DownloadHandler for HttpDownloadHandler {
    fn stream_file(
        &self,
        file_name: &str,
        content_type: &str,
        content: &[u8],
        output: &mut Output,
    ) {
        output.status = StatusCode::OK;
        output.push_header(header::CONTENT_TYPE.as_str(), content_type);
        output.push_header(
            header::CONTENT_DISPOSITION.as_str(),
            format!("attachment; filename=\"{}\"", file_name.replace('"', "")),
        );
        output.body = content.to_vec();
    }
}
