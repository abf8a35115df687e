//! Gateway-internal types exchanged between services and handlers

use chrono::{DateTime, Utc};
use serde::Serialize;
use engine::EngineResult;
use shared::{DispatchStatus, OptimizationResult};

/// One engine invocation as seen by the metrics store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionSample {
    pub execution_time_ms: u64,
    pub succeeded: bool,
    /// Advantage factor of a successful result, if any
    pub advantage_factor: Option<f64>,
}

impl ExecutionSample {
    pub fn success(execution_time_ms: u64, advantage_factor: f64) -> Self {
        Self {
            execution_time_ms,
            succeeded: true,
            advantage_factor: Some(advantage_factor),
        }
    }

    pub fn failure(execution_time_ms: u64) -> Self {
        Self {
            execution_time_ms,
            succeeded: false,
            advantage_factor: None,
        }
    }

    /// Sample for one engine run, timed by the engine on either path
    pub fn from_outcome(outcome: &EngineResult<OptimizationResult>) -> Self {
        match outcome {
            Ok(result) => Self::success(result.execution_time_ms, result.advantage_factor),
            Err(err) => Self::failure(err.execution_time_ms()),
        }
    }
}

/// Last completed delivery to the workflow executor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchAttempt {
    pub request_id: String,
    pub status: DispatchStatus,
    pub at: DateTime<Utc>,
    pub attempts: u32,
    pub error: Option<String>,
}
