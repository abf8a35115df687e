//! `POST /trace`

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};
use shared::{ComponentId, TraceRecord, TraceSubmission, component_info, component_warn};

use crate::gateway_impl::Gateway;
use crate::traits::{MetricsStore, TraceRecorder, WorkflowDispatcher};
use crate::web::ApiError;
use crate::web::response::now_rfc3339;

/// Accept a trace and forward it when a sink is configured
pub async fn trace<D, M, T>(State(gateway): State<Gateway<D, M, T>>, body: Bytes) -> Result<Json<Value>, ApiError>
where
    D: WorkflowDispatcher + 'static,
    M: MetricsStore + 'static,
    T: TraceRecorder + 'static,
{
    let submission: TraceSubmission = serde_json::from_slice(&body).map_err(|e| {
        component_warn!(ComponentId::Tracer, error = %e, "Malformed trace body");
        ApiError::MalformedBody
    })?;

    let trace = TraceRecord::from_submission(
        submission,
        &gateway.config.dispatch.workflow_name,
        &gateway.config.metrics.circuit_id,
        Utc::now(),
    );
    let forwarded = gateway.tracer.record(&trace).await;

    component_info!(
        ComponentId::Tracer,
        session_id = %trace.session_id,
        circuit = %trace.metadata.circuit_id,
        forwarded,
        "Trace accepted"
    );

    Ok(Json(json!({
        "success": true,
        "forwarded": forwarded,
        "traceId": trace.session_id,
        "timestamp": now_rfc3339(),
    })))
}
