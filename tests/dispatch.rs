//! End-to-end dispatch through the axum router.

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use serde_json::Value;
use tower::ServiceExt;

use mvc_dispatch::front::RequestContext;
use mvc_dispatch::routing::RouteTable;

mod common;

use common::{body_string, form, get, Call, Recorder};

#[tokio::test]
async fn test_home_renders_and_starts_session() {
    let router = common::server(common::test_config()).router();

    let response = router.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert!(response.headers().contains_key("x-request-id"));

    let cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session_id="));
    assert!(body_string(response).await.contains("visit 1"));

    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, cookie.as_str())
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert!(!response.headers().contains_key(header::SET_COOKIE));
    assert!(body_string(response).await.contains("visit 2"));
}

#[tokio::test]
async fn test_users_resource_lifecycle() {
    let router = common::server(common::test_config()).router();

    let response = router
        .clone()
        .oneshot(form("POST", "/users", "name=Ann&email=ann%40example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/users/1");

    let response = router.clone().oneshot(get("/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(user["email"], "ann@example.com");

    // Browsers cannot send PUT/DELETE from forms; `_method` overrides POST.
    let response = router
        .clone()
        .oneshot(form("POST", "/users/1", "_method=PUT&name=Anna"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(user["name"], "Anna");

    let response = router
        .clone()
        .oneshot(form("POST", "/users/1", "_method=DELETE"))
        .await
        .unwrap();
    assert_eq!(response.headers()[header::LOCATION], "/users");

    let response = router.oneshot(get("/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_statuses() {
    let router = common::server(common::test_config()).router();

    let response = router.clone().oneshot(get("/nowhere")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "No route matches GET /nowhere");

    // Registered route, unregistered controller type.
    let response = router.clone().oneshot(get("/ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Internal Server Error");

    let response = router.clone().oneshot(get("/users/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router.oneshot(form("POST", "/users", "name=Ann")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download() {
    let router = common::server(common::test_config()).router();
    let response = router.oneshot(get("/export")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"users.csv\""
    );
    assert_eq!(body_string(response).await, "id,name,email\n");
}

#[tokio::test]
async fn test_prefix_system() {
    let mut config = common::test_config();
    config.global.prefix_system = "/app".into();
    let router = common::server(config).router();

    let response = router.clone().oneshot(get("/app/legacy")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/app/");

    let response = router.clone().oneshot(get("/app")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Paths outside the prefix are routed unchanged.
    let response = router.oneshot(get("/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reload_routes_takes_effect() {
    let server = common::server(common::test_config());
    let router = server.router();

    server
        .front()
        .reload_routes(RouteTable::new().get("/start", "home#index").unwrap());

    let response = router.clone().oneshot(get("/start")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// Known quirk, kept deliberately: an actionless rule without placeholders
// matches any path that merely contains its URI. The same URI with an
// explicit action only matches exactly.
#[tokio::test]
async fn test_actionless_rule_substring_quirk() {
    let server = common::server(common::test_config());
    let router = server.router();
    server.front().reload_routes(
        RouteTable::new()
            .get("/docs", "home#export")
            .unwrap()
            .get("/help", "home")
            .unwrap(),
    );

    let response = router.clone().oneshot(get("/old/help/page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Welcome"));

    let response = router.oneshot(get("/old/docs/page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_collaborators_receive_outcomes() {
    let recorder = Recorder::default();
    let front = common::front_controller(&common::test_config())
        .with_collaborators(recorder.collaborators());

    front.dispatch(RequestContext::new(Method::GET, "/legacy")).unwrap();
    front.dispatch(RequestContext::new(Method::GET, "/export")).unwrap();
    let dispatch = front.dispatch(RequestContext::new(Method::GET, "/users")).unwrap();

    assert_eq!(dispatch.controller, "\\Controller\\UsersController");
    assert_eq!(dispatch.action, "index");
    assert_eq!(
        recorder.calls(),
        vec![
            Call::Headers(vec![]),
            Call::Redirect("/".into()),
            Call::Headers(vec![]),
            Call::Download {
                file_name: "users.csv".into(),
                content_type: "text/csv".into(),
            },
            Call::Headers(vec![]),
            Call::Display {
                status: StatusCode::OK,
                content_type: "application/json".into(),
                body: b"[]".to_vec(),
            },
        ]
    );
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let mut config = common::test_config();
    config.admin.enabled = true;
    config.admin.api_key = "secret".into();
    let admin = common::server(config).admin_router().expect("admin enabled");

    let response = admin.clone().oneshot(get("/admin/routes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/admin/routes")
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap();
    let response = admin.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let routes: Vec<Value> = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(routes.len(), 12);
    assert_eq!(routes[0]["controller"], "\\Controller\\HomeController");
    let ghost = routes.iter().find(|r| r["uri"] == "/ghost").unwrap();
    assert_eq!(ghost["resolvable"], false);

    let request = Request::builder()
        .uri("/admin/status")
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap();
    let response = admin.oneshot(request).await.unwrap();
    let status: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(status["routes"], 12);
    assert_eq!(status["status"], "operational");
}

#[test]
fn test_admin_disabled_by_default() {
    assert!(common::server(common::test_config()).admin_router().is_none());
}
