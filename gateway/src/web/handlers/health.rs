//! `GET /health`

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use shared::{ComponentId, DispatchStatus};
use shared::logging::log_error;

use crate::gateway_impl::Gateway;
use crate::traits::{MetricsStore, TraceRecorder, WorkflowDispatcher};
use crate::web::response::now_rfc3339;

/// Operational status of the pipeline and its external collaborators
///
/// Always answers 200; an unconfigured dispatch endpoint or a failed last
/// dispatch reports `degraded`.
pub async fn health<D, M, T>(State(gateway): State<Gateway<D, M, T>>) -> Json<Value>
where
    D: WorkflowDispatcher + 'static,
    M: MetricsStore + 'static,
    T: TraceRecorder + 'static,
{
    let last_attempt = gateway.dispatcher.last_attempt().await;
    let circuits = match gateway.metrics.snapshot().await {
        Ok(metrics) => metrics.len(),
        Err(e) => {
            log_error(ComponentId::Metrics, "Health snapshot", &e);
            0
        }
    };

    let dispatch_configured = gateway.dispatcher.is_configured();
    let last_failed = last_attempt
        .as_ref()
        .is_some_and(|attempt| attempt.status == DispatchStatus::Failed);
    let status = if dispatch_configured && !last_failed {
        "operational"
    } else {
        "degraded"
    };

    Json(json!({
        "success": true,
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSeconds": gateway.state.uptime_seconds(),
        "timestamp": now_rfc3339(),
        "services": {
            "engine": {
                "algorithm": gateway.engine.algorithm(),
                "circuits": circuits,
            },
            "dispatch": {
                "configured": dispatch_configured,
                "mode": gateway.dispatcher.mode(),
                "timeoutMs": gateway.dispatcher.timeout_ms(),
                "lastStatus": last_attempt.as_ref().map(|attempt| attempt.status),
                "lastAttemptAt": last_attempt.as_ref().map(|attempt| attempt.at),
                "lastError": last_attempt.as_ref().and_then(|attempt| attempt.error.clone()),
            },
            "traceSink": {
                "configured": gateway.tracer.is_configured(),
                "credentialConfigured": gateway.tracer.has_credential(),
            },
        },
    }))
}
