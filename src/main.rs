//! MVC dispatch server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http::server ──▶ front::FrontController
//!                      (axum, layers)       │
//!                                           ├─▶ session     (cookie → SessionStore)
//!                                           ├─▶ routing     (RouteTable::find)
//!                                           ├─▶ inject      (per-request Injector)
//!                                           ├─▶ resolver    (token → Controller)
//!                                           └─▶ controller  (call_action → ActionResult)
//!     Client Response                           │
//!     ◀─────────────── http::response ◀── Output (status, headers, body)
//!
//!     Cross-cutting: config (TOML + hot reload), observability, admin API, lifecycle
//! ```
//!
//! Usage: `mvc-dispatch [CONFIG]`. The path may also come from
//! `MVC_DISPATCH_CONFIG`; without either the built-in defaults are used.

use std::path::PathBuf;

use tokio::net::TcpListener;

use mvc_dispatch::config::loader::load_config;
use mvc_dispatch::config::watcher::ConfigWatcher;
use mvc_dispatch::config::AppConfig;
use mvc_dispatch::controllers;
use mvc_dispatch::inject::Bindings;
use mvc_dispatch::lifecycle::{build_front_controller, signals, Shutdown};
use mvc_dispatch::observability::{logging, metrics};
use mvc_dispatch::resolver::ControllerResolver;
use mvc_dispatch::routing::RouteTable;
use mvc_dispatch::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MVC_DISPATCH_CONFIG").ok())
        .map(PathBuf::from);

    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mvc-dispatch starting");
    tracing::info!(
        config = ?config_path,
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        prefix_system = %config.global.prefix_system,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut resolver = ControllerResolver::new(config.global.controller_namespace.as_str());
    let mut bindings = Bindings::new();
    controllers::register(&mut resolver, &mut bindings);
    let front = build_front_controller(&config, resolver, bindings)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config.clone(), front);

    if let Some(admin) = server.admin_router() {
        let admin_listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %admin_listener.local_addr()?, "Admin API listening");
        let admin_shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(admin_listener, admin)
                .with_graceful_shutdown(admin_shutdown.wait())
                .await
            {
                tracing::error!(error = %e, "Admin server failed");
            }
        });
    }

    // Keep the notify watcher alive until shutdown.
    let _watcher = match &config_path {
        Some(path) => {
            let (watcher, mut updates) = ConfigWatcher::new(path);
            let front = server.front();
            tokio::spawn(async move {
                while let Some(new_config) = updates.recv().await {
                    match RouteTable::from_config(&new_config.routes) {
                        Ok(routes) => front.reload_routes(routes),
                        Err(e) => tracing::error!(error = %e, "Rejected reloaded routes"),
                    }
                }
            });
            match watcher.run() {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload disabled");
                    None
                }
            }
        }
        None => None,
    };

    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
