//! Liveness/readiness/metrics routes served over a real socket.

use healthiq_core::{health_routes, mark_ready, Outcome, PREDICTION_METRICS};
use std::net::SocketAddr;

async fn spawn_routes() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app: axum::Router = health_routes();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

#[tokio::test]
async fn readiness_follows_lifecycle() {
    let addr = spawn_routes().await;
    let client = reqwest::Client::new();

    let live = client.get(format!("http://{addr}/live")).send().await.expect("live");
    assert!(live.status().is_success());

    let before = client.get(format!("http://{addr}/ready")).send().await.expect("ready");
    assert_eq!(before.status().as_u16(), 503);
    let body: serde_json::Value = before.json().await.expect("json");
    assert_eq!(body["phase"], "UNINITIALIZED");

    mark_ready();
    let after = client.get(format!("http://{addr}/ready")).send().await.expect("ready");
    assert_eq!(after.status().as_u16(), 200);
    let body: serde_json::Value = after.json().await.expect("json");
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn metrics_endpoint_exposes_prediction_counters() {
    PREDICTION_METRICS.record(Outcome::Ok);
    let addr = spawn_routes().await;
    let body = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .expect("metrics request")
        .text()
        .await
        .expect("text");
    assert!(body.contains("healthiq_predictions_total"), "missing predictions counter");
}
