//! Real listener tests.

use std::time::Duration;

use mvc_dispatch::lifecycle::Shutdown;

mod common;

#[tokio::test]
async fn test_serves_over_tcp_until_shutdown() {
    let server = common::server(common::test_config());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.clone()));

    let client = reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let res = client
        .post(format!("http://{}/users", addr))
        .form(&[("name", "Ann"), ("email", "ann@example.com")])
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), 302);
    assert_eq!(res.headers()["location"], "/users/1");

    let res = client.get(format!("http://{}/users", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let users: serde_json::Value = res.json().await.unwrap();
    assert_eq!(users[0]["name"], "Ann");

    let res = client
        .get(format!("http://{}/users/1", addr))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server stops after shutdown")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_requests() {
    let server = common::server(common::test_config());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    tokio::spawn(server.run(listener, shutdown.clone()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let mut tasks = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let mut ok = 0;
            for _ in 0..10 {
                let res = client.get(format!("http://{}/users", addr)).send().await.unwrap();
                if res.status() == 200 {
                    ok += 1;
                }
            }
            ok
        }));
    }

    let mut total = 0;
    for task in tasks {
        total += task.await.unwrap();
    }
    assert_eq!(total, 200);

    shutdown.trigger();
}
