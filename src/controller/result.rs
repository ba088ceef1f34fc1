//! Action outcomes.

use axum::http::StatusCode;
use serde_json::Value;

/// What an action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Rendered view content.
    Render {
        view: String,
        content: String,
        status: StatusCode,
    },
    /// Serialized JSON document.
    Json { value: Value, status: StatusCode },
    /// Redirect to another location.
    Redirect { location: String },
    /// File download.
    Download {
        file_name: String,
        content_type: String,
        content: Vec<u8>,
    },
    /// Nothing to output.
    NoContent,
}

impl Outcome {
    /// Short label used in logs, metrics and dispatch records.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Render { .. } => "show",
            Outcome::Json { .. } => "json",
            Outcome::Redirect { .. } => "redirect",
            Outcome::Download { .. } => "file",
            Outcome::NoContent => "none",
        }
    }
}

/// Outcome of an action plus response headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub outcome: Outcome,
    pub headers: Vec<(String, String)>,
}

impl ActionResult {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            headers: Vec::new(),
        }
    }

    pub fn render(view: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Outcome::Render {
            view: view.into(),
            content: content.into(),
            status: StatusCode::OK,
        })
    }

    pub fn json(value: Value) -> Self {
        Self::new(Outcome::Json {
            value,
            status: StatusCode::OK,
        })
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(Outcome::Redirect {
            location: location.into(),
        })
    }

    pub fn download(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self::new(Outcome::Download {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content,
        })
    }

    pub fn no_content() -> Self {
        Self::new(Outcome::NoContent)
    }

    /// Override the status of a render or json outcome.
    pub fn with_status(mut self, code: StatusCode) -> Self {
        match &mut self.outcome {
            Outcome::Render { status, .. } | Outcome::Json { status, .. } => *status = code,
            _ => {}
        }
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// View name when the outcome is a render.
    pub fn view(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Render { view, .. } => Some(view),
            _ => None,
        }
    }
}
