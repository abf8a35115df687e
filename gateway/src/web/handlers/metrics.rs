//! `GET /metrics`

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};
use shared::ComponentId;
use shared::logging::log_error;

use crate::gateway_impl::Gateway;
use crate::traits::{MetricsStore, TraceRecorder, WorkflowDispatcher};
use crate::web::{ApiError, success_envelope};

/// Every circuit plus a summary computed from the same snapshot
pub async fn metrics<D, M, T>(State(gateway): State<Gateway<D, M, T>>) -> Result<Json<Value>, ApiError>
where
    D: WorkflowDispatcher + 'static,
    M: MetricsStore + 'static,
    T: TraceRecorder + 'static,
{
    let (metrics, summary) = gateway.metrics.report_at(Utc::now()).await.map_err(|e| {
        log_error(ComponentId::Metrics, "Metrics snapshot", &e);
        ApiError::internal(&e, gateway.config.expose_error_details)
    })?;

    Ok(Json(success_envelope(json!({
        "totalCircuits": metrics.len(),
        "metrics": metrics,
        "summary": summary,
    }))))
}
