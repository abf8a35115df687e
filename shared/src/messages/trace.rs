//! Execution trace message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Trace fields as submitted by a caller; everything is optional
///
/// Accepts both the flat shape and the nested `metadata` shape of a
/// [`TraceRecord`]; nested values win over flat ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceSubmission {
    pub session_id: Option<String>,
    pub workflow_name: Option<String>,
    pub circuit_id: Option<String>,
    pub company_code: Option<String>,
    /// Milliseconds; fractional values are rounded
    pub execution_time: Option<f64>,
    pub improvement: Option<f64>,
    pub confidence: Option<f64>,
    pub metadata: Option<TraceMetadataSubmission>,
    pub inputs: Option<Value>,
    pub outputs: Option<Value>,
}

/// Nested metadata as submitted, mirroring [`TraceMetadata`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceMetadataSubmission {
    pub circuit_id: Option<String>,
    pub company_code: Option<String>,
    pub execution_time: Option<f64>,
    pub improvement: Option<f64>,
    pub confidence: Option<f64>,
}

/// Nested metadata describing the traced execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceMetadata {
    pub circuit_id: String,
    pub company_code: Option<String>,
    pub execution_time: u64,
    pub improvement: f64,
    pub confidence: Option<f64>,
}

/// A trace as forwarded to the observability sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub session_id: String,
    pub workflow_name: String,
    pub metadata: TraceMetadata,
    pub inputs: Value,
    pub outputs: Value,
    pub timestamp: DateTime<Utc>,
}

impl TraceRecord {
    /// Fill in a submission's gaps and stamp it
    pub fn from_submission(
        submission: TraceSubmission,
        default_workflow: &str,
        default_circuit: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let session_id = non_blank(submission.session_id).unwrap_or_else(|| Uuid::new_v4().to_string());
        let nested = submission.metadata.unwrap_or_default();

        let execution_time = nested
            .execution_time
            .or(submission.execution_time)
            .map(whole_millis)
            .unwrap_or(0);
        let improvement = nested
            .improvement
            .or(submission.improvement)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);

        Self {
            session_id,
            workflow_name: non_blank(submission.workflow_name).unwrap_or_else(|| default_workflow.to_string()),
            metadata: TraceMetadata {
                circuit_id: non_blank(nested.circuit_id)
                    .or_else(|| non_blank(submission.circuit_id))
                    .unwrap_or_else(|| default_circuit.to_string()),
                company_code: non_blank(nested.company_code).or_else(|| non_blank(submission.company_code)),
                execution_time,
                improvement,
                confidence: nested.confidence.or(submission.confidence).filter(|v| v.is_finite()),
            },
            inputs: submission.inputs.unwrap_or_else(empty_object),
            outputs: submission.outputs.unwrap_or_else(empty_object),
            timestamp: now,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Negative or non-finite durations count as zero
fn whole_millis(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
