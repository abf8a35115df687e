//! Optimization result message types

use serde::{Deserialize, Serialize};

/// One labeled entry of the descriptive state vector, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub label: String,
    pub probability: f64,
}

impl StateEntry {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// Output of one engine invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub optimized_value: f64,
    pub confidence: f64,
    pub state_vector: Vec<StateEntry>,
    pub baseline_value: f64,
    /// Percentage change from baseline, may be negative
    pub improvement: f64,
    pub advantage_factor: f64,
    pub algorithm: String,
    pub circuit_depth: u32,
    pub execution_time_ms: u64,
}

impl OptimizationResult {
    /// Name of the first non-finite output, if any
    pub fn first_non_finite_field(&self) -> Option<&'static str> {
        if !self.optimized_value.is_finite() {
            Some("optimizedValue")
        } else if !self.improvement.is_finite() {
            Some("improvement")
        } else if !self.confidence.is_finite() {
            Some("confidence")
        } else if !self.advantage_factor.is_finite() {
            Some("advantageFactor")
        } else if self.state_vector.iter().any(|entry| !entry.probability.is_finite()) {
            Some("stateVector")
        } else {
            None
        }
    }
}
