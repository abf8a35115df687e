//! Workflow dispatch outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a dispatch to the external workflow executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    /// Handed off, completion not yet known (detached mode)
    Pending,
    Success,
    Failed,
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStatus::Pending => write!(f, "pending"),
            DispatchStatus::Success => write!(f, "success"),
            DispatchStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a dispatch attempt, created once by the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDispatchOutcome {
    pub triggered: bool,
    pub workflow_id: Option<String>,
    pub status: DispatchStatus,
    pub error: Option<String>,
}

impl WorkflowDispatchOutcome {
    /// The executor accepted the submission
    pub fn success(workflow_id: Option<String>) -> Self {
        Self {
            triggered: true,
            workflow_id,
            status: DispatchStatus::Success,
            error: None,
        }
    }

    /// Fallback outcome: the enclosing request still succeeds
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            triggered: false,
            workflow_id: None,
            status: DispatchStatus::Failed,
            error: Some(error.into()),
        }
    }

    /// Submission handed to a background task
    pub fn pending() -> Self {
        Self {
            triggered: true,
            workflow_id: None,
            status: DispatchStatus::Pending,
            error: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == DispatchStatus::Failed
    }
}
