use std::sync::Once;

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tezbridge_core::{
    CoreError, HttpTransport, HttpTransportConfig, Method, RpcError, Transport,
};

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tezbridge_core=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

fn content_type(headers: &HeaderMap) -> Value {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(Value::Null, |v| Value::String(v.to_owned()))
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    Json(json!({ "content_type": content_type(&headers) }))
}

async fn echo_post(headers: HeaderMap, body: String) -> Json<Value> {
    let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    Json(json!({ "content_type": content_type(&headers), "body": parsed }))
}

async fn body_len(body: String) -> Json<Value> {
    Json(json!({ "body_len": body.len() }))
}

/// Serve a stub node on an ephemeral port and return its base URL.
async fn spawn_stub_node() -> String {
    let app = Router::new()
        .route("/chains/main/blocks/head/hash", get(|| async { Json(json!("BLstub")) }))
        .route("/chains/main/blocks/head/header", get(echo_headers))
        .route("/explorer/v3/head", get(echo_headers))
        .route("/body_len", get(body_len))
        .route("/echo", post(echo_post))
        .route(
            "/failing",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"[{"kind":"temporary","id":"failure"}]"#,
                )
            }),
        )
        .route("/garbage", get(|| async { "definitely not json" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener must have an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub node must serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn get_resolves_parsed_json() {
    init_tracing();
    let base = spawn_stub_node().await;
    let transport = HttpTransport::new().expect("transport must build");

    let value = transport
        .request(&format!("{base}/chains/main/blocks/head/hash"), None, Method::Get)
        .await
        .expect("GET must succeed");
    assert_eq!(value, json!("BLstub"));
}

#[tokio::test]
async fn post_sends_json_body_with_content_type() {
    init_tracing();
    let base = spawn_stub_node().await;
    let transport = HttpTransport::new().expect("transport must build");
    let body = json!({ "branch": "BLstub", "contents": [] });

    let echoed = transport
        .request(&format!("{base}/echo"), Some(&body), Method::Post)
        .await
        .expect("POST must succeed");

    assert_eq!(echoed["content_type"], json!("application/json"));
    assert_eq!(echoed["body"], body);
}

#[tokio::test]
async fn get_payload_never_reaches_the_node() {
    init_tracing();
    let base = spawn_stub_node().await;
    let transport = HttpTransport::new().expect("transport must build");
    let payload = json!({ "ignored": true });

    let echoed = transport
        .request(&format!("{base}/body_len"), Some(&payload), Method::Get)
        .await
        .expect("GET must succeed");
    assert_eq!(echoed["body_len"], json!(0));
}

#[tokio::test]
async fn plain_host_pattern_omits_content_type() {
    init_tracing();
    let base = spawn_stub_node().await;
    let transport = HttpTransport::with_config(HttpTransportConfig {
        plain_hosts: vec!["/explorer/v3".to_owned()],
        ..HttpTransportConfig::default()
    })
    .expect("transport must build");

    let plain = transport
        .request(&format!("{base}/explorer/v3/head"), None, Method::Get)
        .await
        .expect("GET must succeed");
    assert_eq!(plain["content_type"], Value::Null);

    let node = transport
        .request(&format!("{base}/chains/main/blocks/head/header"), None, Method::Get)
        .await
        .expect("GET must succeed");
    assert_eq!(node["content_type"], json!("application/json"));
}

#[tokio::test]
async fn non_success_status_keeps_raw_body() {
    init_tracing();
    let base = spawn_stub_node().await;
    let transport = HttpTransport::new().expect("transport must build");

    let err = transport
        .request(&format!("{base}/failing"), None, Method::Get)
        .await
        .expect_err("500 must fail");
    match err {
        CoreError::Rpc(RpcError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, r#"[{"kind":"temporary","id":"failure"}]"#);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_json_is_an_error_not_a_hang() {
    init_tracing();
    let base = spawn_stub_node().await;
    let transport = HttpTransport::new().expect("transport must build");

    let result = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        transport.request(&format!("{base}/garbage"), None, Method::Get),
    )
    .await
    .expect("request must settle");

    let err = result.expect_err("garbage body must fail");
    assert!(matches!(err, CoreError::Rpc(RpcError::InvalidResponse(_))));
    assert!(err.to_string().contains("definitely not json"));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    init_tracing();
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener must have an address");
    drop(listener);

    let transport = HttpTransport::new().expect("transport must build");
    let err = transport
        .request(&format!("http://{addr}/chains/main/blocks/head"), None, Method::Get)
        .await
        .expect_err("closed port must fail");
    assert!(matches!(err, CoreError::Rpc(RpcError::Transport(_))));
}
