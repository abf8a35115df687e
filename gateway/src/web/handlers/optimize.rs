//! `POST /optimize`: validate, optimize, then record and dispatch concurrently

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use shared::logging::log_error;
use shared::{ComponentId, component_info, component_warn};
use uuid::Uuid;

use crate::error::GatewayError;
use crate::gateway_impl::Gateway;
use crate::traits::{MetricsStore, TraceRecorder, WorkflowDispatcher};
use crate::types::ExecutionSample;
use crate::web::{ApiError, success_envelope};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
pub const ALGORITHM_HEADER: HeaderName = HeaderName::from_static("x-algorithm");
pub const PROCESSING_TIME_HEADER: HeaderName = HeaderName::from_static("x-processing-time-ms");

pub async fn optimize<D, M, T>(State(gateway): State<Gateway<D, M, T>>, body: Bytes) -> Result<Response, ApiError>
where
    D: WorkflowDispatcher + 'static,
    M: MetricsStore + 'static,
    T: TraceRecorder + 'static,
{
    let started = Instant::now();
    let sequence = gateway.state.begin_request();
    let request_id = Uuid::new_v4().to_string();
    let expose = gateway.config.expose_error_details;

    let candidate: Value = serde_json::from_slice(&body).map_err(|e| {
        gateway.state.record_rejection();
        component_warn!(ComponentId::Validator, request_id = %request_id, error = %e, "Malformed request body");
        ApiError::MalformedBody
    })?;

    let record = gateway.validator.validate(&candidate).map_err(|e| {
        gateway.state.record_rejection();
        component_warn!(ComponentId::Validator, request_id = %request_id, fields = ?e.fields, "Record rejected");
        ApiError::from(e)
    })?;

    let circuit_id = gateway.config.metrics.circuit_id.as_str();

    let outcome = gateway.engine.optimize_checked(&record);
    let sample = ExecutionSample::from_outcome(&outcome);
    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            if let Err(store_err) = gateway.metrics.record_execution(circuit_id, sample).await {
                log_error(ComponentId::Metrics, "Recording failed execution", &store_err);
            }
            let err = GatewayError::from(err);
            log_error(ComponentId::Engine, "Optimization", &err);
            return Err(ApiError::internal(&err, expose));
        }
    };

    let (recorded, dispatch) = tokio::join!(
        gateway.metrics.record_execution(circuit_id, sample),
        gateway.dispatcher.dispatch(&request_id, &record, &result),
    );
    recorded.map_err(|e| {
        log_error(ComponentId::Metrics, "Recording execution", &e);
        ApiError::internal(&e, expose)
    })?;

    gateway.state.record_optimization();
    let processing_time_ms = started.elapsed().as_millis() as u64;

    component_info!(
        ComponentId::Gateway,
        request_id = %request_id,
        sequence,
        material = %record.material_number,
        improvement = result.improvement,
        dispatch = %dispatch.status,
        processing_time_ms,
        "Optimization completed"
    );

    let headers = [
        (REQUEST_ID_HEADER, request_id),
        (ALGORITHM_HEADER, result.algorithm.clone()),
        (PROCESSING_TIME_HEADER, processing_time_ms.to_string()),
    ];
    let body = success_envelope(json!({
        "input": record,
        "metadata": {
            "algorithmVersion": result.algorithm,
            "processingTimeMs": processing_time_ms,
            "improvementPct": result.improvement,
            "confidence": result.confidence,
        },
        "result": result,
        "dispatch": dispatch,
    }));

    Ok((StatusCode::OK, headers, Json(body)).into_response())
}
