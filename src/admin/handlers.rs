use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub routes: usize,
    pub controllers: Vec<String>,
    pub prefix_system: String,
}

#[derive(Debug, Serialize)]
pub struct RouteStatus {
    pub method: String,
    pub uri: String,
    pub target: String,
    pub controller: String,
    pub action: String,
    /// Whether a controller is registered under `controller`.
    pub resolvable: bool,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let resolver = state.front.resolver();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        routes: state.front.routes().len(),
        controllers: resolver
            .registry()
            .type_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        prefix_system: state.front.global().prefix_system.clone(),
    })
}

pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteStatus>> {
    let resolver = state.front.resolver();
    let default_action = &state.front.global().default_action;
    let routes = state.front.routes();

    let statuses = routes
        .rules()
        .iter()
        .map(|rule| {
            let controller = resolver.type_name(rule.controller());
            RouteStatus {
                method: rule.method().to_string(),
                uri: rule.uri().to_string(),
                target: rule.target().to_string(),
                resolvable: resolver.registry().contains(&controller),
                controller,
                action: rule.action().unwrap_or(default_action.as_str()).to_string(),
            }
        })
        .collect();

    Json(statuses)
}
