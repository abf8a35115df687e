//! HTTP API integration tests
//!
//! Drive the full router with the real services; the workflow executor and
//! trace sink are `wiremock` servers or unreachable ports.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::*;

#[tokio::test]
async fn test_optimize_reference_record_without_dispatch_endpoint() {
    let router = create_gateway(create_test_config()).build_router();

    let (status, headers, body) = send(&router, post_json("/optimize", &reference_record())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let result = &body["data"]["result"];
    assert!((result["optimizedValue"].as_f64().unwrap() - 135.40).abs() < 0.011);
    assert_eq!(result["baselineValue"], 125.5);
    assert_eq!(result["algorithm"], "QAOA-PUP-v1.2");
    assert_eq!(result["stateVector"].as_array().unwrap().len(), 4);

    let confidence = result["confidence"].as_f64().unwrap();
    assert!((0.75..=0.98).contains(&confidence));
    assert!(result["improvement"].as_f64().unwrap().abs() <= 12.0);

    let dispatch = &body["data"]["dispatch"];
    assert_eq!(dispatch["triggered"], false);
    assert_eq!(dispatch["status"], "failed");
    assert_eq!(dispatch["error"], "dispatch endpoint not configured");

    assert_eq!(body["data"]["metadata"]["algorithmVersion"], "QAOA-PUP-v1.2");
    assert_eq!(body["data"]["input"]["MaterialNumber"], "MAT-1");
    assert!(body["timestamp"].is_string());

    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-algorithm"], "QAOA-PUP-v1.2");
    assert!(headers.contains_key("x-processing-time-ms"));
}

#[tokio::test]
async fn test_unreachable_dispatch_still_returns_200() {
    let router = create_gateway(create_config_with_dispatch(&unreachable_endpoint())).build_router();

    let (status, _, body) = send(&router, post_json("/optimize", &reference_record())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["dispatch"]["triggered"], false);
    assert_eq!(body["data"]["dispatch"]["status"], "failed");
}

#[tokio::test]
async fn test_successful_dispatch_reports_workflow_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/optimize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workflowId": "wf-42"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_config_with_dispatch(&format!("{}/webhook/optimize", server.uri()));
    let router = create_gateway(config).build_router();

    let (status, _, body) = send(&router, post_json("/optimize", &reference_record())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["dispatch"]["triggered"], true);
    assert_eq!(body["data"]["dispatch"]["status"], "success");
    assert_eq!(body["data"]["dispatch"]["workflowId"], "wf-42");
}

#[tokio::test]
async fn test_invalid_record_lists_every_violation() {
    let router = create_gateway(create_test_config()).build_router();

    let mut record = reference_record();
    record.as_object_mut().unwrap().remove("MaterialNumber");
    record["PUPValue"] = json!(0);

    let (status, _, body) = send(&router, post_json("/optimize", &record)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid input");
    let details: Vec<&str> = body["details"].as_array().unwrap().iter().map(|d| d.as_str().unwrap()).collect();
    assert!(details.contains(&"MaterialNumber"));
    assert!(details.contains(&"PUPValue"));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let router = create_gateway(create_test_config()).build_router();

    let (status, _, body) = send(&router, post_raw("/optimize", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Malformed JSON body");
    assert_eq!(body["details"], json!([]));
}

#[tokio::test]
async fn test_optional_fields_are_defaulted() {
    let router = create_gateway(create_test_config()).build_router();

    let mut record = reference_record();
    for field in ["Plant", "ValuationClass", "MovingPrice"] {
        record.as_object_mut().unwrap().remove(field);
    }

    let (status, _, body) = send(&router, post_json("/optimize", &record)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["input"]["Plant"], "P001");
    assert_eq!(body["data"]["input"]["ValuationClass"], "3000");
}

#[tokio::test]
async fn test_metrics_start_empty() {
    let router = create_gateway(create_test_config()).build_router();

    let (status, _, body) = send(&router, get("/metrics")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCircuits"], 0);
    assert_eq!(body["data"]["metrics"], json!([]));
    assert_eq!(body["data"]["summary"]["totalExecutions"], 0);
    assert_eq!(body["data"]["summary"]["bestAdvantageRatio"], 0.0);
}

#[tokio::test]
async fn test_metrics_count_only_engine_executions() {
    let router = create_gateway(create_test_config()).build_router();

    send(&router, post_json("/optimize", &reference_record())).await;
    send(&router, post_json("/optimize", &reference_record())).await;
    send(&router, post_json("/optimize", &json!({"CompanyCode": "1000"}))).await;

    let (status, _, body) = send(&router, get("/metrics")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCircuits"], 1);

    let metric = &body["data"]["metrics"][0];
    assert_eq!(metric["circuitId"], "pup_optimizer");
    assert_eq!(metric["executionCount"], 2);
    assert_eq!(metric["successRate"], 1.0);
    assert_eq!(metric["errorRate"], 0.0);
    assert!((metric["advantageRatio"].as_f64().unwrap() - 1.0789).abs() < 1e-9);

    let summary = &body["data"]["summary"];
    assert_eq!(summary["totalExecutions"], 2);
    assert_eq!(summary["activeCircuits"], 1);
}

#[tokio::test]
async fn test_trace_without_sink_is_accepted_locally() {
    let router = create_gateway(create_test_config()).build_router();

    let (status, _, body) = send(&router, post_json("/trace", &json!({"session_id": "run-7", "improvement": 7.89}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["forwarded"], false);
    assert_eq!(body["traceId"], "run-7");
}

#[tokio::test]
async fn test_trace_generates_session_id() {
    let router = create_gateway(create_test_config()).build_router();

    let (_, _, body) = send(&router, post_json("/trace", &json!({}))).await;

    let trace_id = body["traceId"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(trace_id).is_ok());
}

#[tokio::test]
async fn test_trace_forwarded_to_sink() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs"))
        .and(header("x-api-key", "sink-key"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.trace_sink.endpoint = Some(url::Url::parse(&format!("{}/runs", server.uri())).unwrap());
    config.trace_sink.api_key = Some("sink-key".to_string());
    let router = create_gateway(config).build_router();

    let (status, _, body) = send(&router, post_json("/trace", &json!({"circuit_id": "pup_optimizer"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forwarded"], true);
}

#[tokio::test]
async fn test_malformed_trace_is_rejected() {
    let router = create_gateway(create_test_config()).build_router();

    let (status, _, body) = send(&router, post_raw("/trace", "[1, 2")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Malformed JSON body");
}

#[tokio::test]
async fn test_health_reports_unconfigured_collaborators() {
    let router = create_gateway(create_test_config()).build_router();

    let (status, _, body) = send(&router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["services"]["engine"]["algorithm"], "QAOA-PUP-v1.2");
    assert_eq!(body["services"]["dispatch"]["configured"], false);
    assert_eq!(body["services"]["dispatch"]["mode"], "await");
    assert_eq!(body["services"]["dispatch"]["timeoutMs"], 15_000);
    assert_eq!(body["services"]["traceSink"]["configured"], false);
    assert_eq!(body["services"]["traceSink"]["credentialConfigured"], false);
}

#[tokio::test]
async fn test_health_operational_with_dispatch_configured() {
    let router = create_gateway(create_config_with_dispatch("http://127.0.0.1:9/hook")).build_router();

    let (_, _, body) = send(&router, get("/health")).await;

    assert_eq!(body["status"], "operational");
    assert_eq!(body["services"]["dispatch"]["configured"], true);
    assert!(body["services"]["dispatch"]["lastStatus"].is_null());
}

#[tokio::test]
async fn test_health_degrades_after_failed_dispatch() {
    let router = create_gateway(create_config_with_dispatch(&unreachable_endpoint())).build_router();

    send(&router, post_json("/optimize", &reference_record())).await;
    let (_, _, body) = send(&router, get("/health")).await;

    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["dispatch"]["lastStatus"], "failed");
    assert!(body["services"]["dispatch"]["lastError"].is_string());
    assert_eq!(body["services"]["engine"]["circuits"], 1);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let router = create_gateway(create_test_config()).build_router();

    let (status, _, body) = send(&router, get("/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Not found"}));
}

#[tokio::test]
async fn test_trace_record_shape_keeps_nested_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.trace_sink.endpoint = Some(url::Url::parse(&format!("{}/runs", server.uri())).unwrap());
    let router = create_gateway(config).build_router();

    let trace = json!({
        "session_id": "s-1",
        "workflow_name": "monthly-close",
        "metadata": {
            "circuit_id": "cost_reduction",
            "company_code": "2000",
            "execution_time": 18,
            "improvement": 4.2,
            "confidence": 0.9
        },
        "inputs": {"PUPValue": 10.0},
        "outputs": {},
        "timestamp": "2025-08-14T09:30:00Z"
    });
    let (status, _, body) = send(&router, post_json("/trace", &trace)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forwarded"], true);
    assert_eq!(body["traceId"], "s-1");

    let requests = server.received_requests().await.unwrap();
    let forwarded: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(forwarded["metadata"]["circuit_id"], "cost_reduction");
    assert_eq!(forwarded["metadata"]["company_code"], "2000");
    assert_eq!(forwarded["metadata"]["execution_time"], 18);
    assert_eq!(forwarded["workflow_name"], "monthly-close");
}

#[tokio::test]
async fn test_trace_with_fractional_execution_time_is_accepted() {
    let router = create_gateway(create_test_config()).build_router();

    let (status, _, body) = send(&router, post_json("/trace", &json!({"execution_time": 12.5}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let router = create_gateway(create_test_config()).build_router();

    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/optimize")
        .header("origin", "https://erp.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, headers, _) = send(&router, request).await;

    assert!(status.is_success());
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(headers.contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn test_cors_header_on_optimize_response() {
    let router = create_gateway(create_test_config()).build_router();

    let mut request = post_json("/optimize", &reference_record());
    request
        .headers_mut()
        .insert("origin", axum::http::HeaderValue::from_static("https://erp.example.com"));
    let (status, headers, _) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_overflowing_magnitudes_are_rejected_as_invalid_input() {
    let router = create_gateway(create_test_config()).build_router();

    let mut record = reference_record();
    record["PUPValue"] = json!(1e300);
    record["StandardPrice"] = json!(1e-300);

    let (status, _, body) = send(&router, post_json("/optimize", &record)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input");
    assert_eq!(body["details"], json!(["PUPValue", "StandardPrice"]));
}
