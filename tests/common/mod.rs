//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;

use mvc_dispatch::config::{AppConfig, RouteConfig};
use mvc_dispatch::controllers;
use mvc_dispatch::front::{
    Collaborators, DownloadHandler, HeaderSender, HttpDownloadHandler, HttpHeaderSender,
    HttpOutputDisplayer, HttpRedirectHandler, NoSession, Output, OutputDisplayer,
    RedirectHandler,
};
use mvc_dispatch::inject::Bindings;
use mvc_dispatch::lifecycle::build_front_controller;
use mvc_dispatch::resolver::ControllerResolver;
use mvc_dispatch::{FrontController, HttpServer};

/// Config with the bundled routes: home, export, legacy redirect, users resource.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.routes = vec![
        RouteConfig::rule("GET", "/", "home#index"),
        RouteConfig::rule("GET", "/export", "home#export"),
        RouteConfig::rule("GET", "/legacy", "home#legacy"),
        RouteConfig::Resource { resource: "users".into() },
        RouteConfig::rule("GET", "/ghost", "ghost#index"),
    ];
    config
}

/// Front controller with the bundled controllers registered.
pub fn front_controller(config: &AppConfig) -> FrontController {
    let mut resolver = ControllerResolver::new(config.global.controller_namespace.as_str());
    let mut bindings = Bindings::new();
    controllers::register(&mut resolver, &mut bindings);
    build_front_controller(config, resolver, bindings).expect("valid test config")
}

pub fn server(config: AppConfig) -> HttpServer {
    let front = front_controller(&config);
    HttpServer::new(config, front)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn form(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// One call made to a recording collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Headers(Vec<(String, String)>),
    Display { status: StatusCode, content_type: String, body: Vec<u8> },
    Redirect(String),
    Download { file_name: String, content_type: String },
}

/// Collaborator double that records every call and then delegates to the
/// default HTTP implementation.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            session: Arc::new(NoSession),
            header_sender: Arc::new(self.clone()),
            output_displayer: Arc::new(self.clone()),
            redirect_handler: Arc::new(self.clone()),
            download_handler: Arc::new(self.clone()),
        }
    }
}

impl HeaderSender for Recorder {
    fn send(&self, headers: &[(String, String)], output: &mut Output) {
        self.record(Call::Headers(headers.to_vec()));
        HttpHeaderSender.send(headers, output);
    }
}

impl OutputDisplayer for Recorder {
    fn display(&self, status: StatusCode, content_type: &str, content: &[u8], output: &mut Output) {
        self.record(Call::Display {
            status,
            content_type: content_type.to_string(),
            body: content.to_vec(),
        });
        HttpOutputDisplayer.display(status, content_type, content, output);
    }
}

impl RedirectHandler for Recorder {
    fn redirect(&self, location: &str, output: &mut Output) {
        self.record(Call::Redirect(location.to_string()));
        HttpRedirectHandler.redirect(location, output);
    }
}

impl DownloadHandler for Recorder {
    fn stream_file(
        &self,
        file_name: &str,
        content_type: &str,
        content: &[u8],
        output: &mut Output,
    ) {
        self.record(Call::Download {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
        });
        HttpDownloadHandler.stream_file(file_name, content_type, content, output);
    }
}
