//! Test helper utilities for gateway integration tests

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use gateway::{Gateway, GatewayConfig, InMemoryMetricsStore, RealTraceRecorder, RealWorkflowDispatcher};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

pub type RealGateway = Gateway<RealWorkflowDispatcher, InMemoryMetricsStore, RealTraceRecorder>;

/// Default configuration: no dispatch endpoint, no trace sink
pub fn create_test_config() -> GatewayConfig {
    GatewayConfig::default()
}

/// Configuration dispatching to `endpoint` with a short timeout
pub fn create_config_with_dispatch(endpoint: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.dispatch.endpoint = Some(Url::parse(endpoint).unwrap());
    config.dispatch.timeout = Duration::from_millis(1_000);
    config
}

/// Gateway wired with the real services
pub fn create_gateway(config: GatewayConfig) -> RealGateway {
    let dispatcher = RealWorkflowDispatcher::new(config.dispatch.clone()).unwrap();
    let metrics = InMemoryMetricsStore::new(config.metrics.active_window);
    let tracer = RealTraceRecorder::new(config.trace_sink.clone()).unwrap();
    Gateway::new(config, dispatcher, metrics, tracer)
}

/// The reference record from the pipeline documentation
pub fn reference_record() -> Value {
    json!({
        "CompanyCode": "1000",
        "MaterialNumber": "MAT-1",
        "Plant": "P001",
        "Period": "2025-08",
        "PUPValue": 125.5,
        "StandardPrice": 100.0,
        "MovingPrice": 110.0,
        "Quantity": 500,
        "ValuationClass": "3000"
    })
}

/// URL of a local port with nothing listening on it
pub fn unreachable_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/webhook/optimize")
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, serde_json::to_vec(body).unwrap())
}

pub fn post_raw(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

/// Drive one request through the router without a socket
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
