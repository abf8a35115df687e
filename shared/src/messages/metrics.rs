//! Metrics and statistics message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of one circuit's counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitMetric {
    pub circuit_id: String,
    pub execution_count: u64,
    /// Running mean in milliseconds
    pub average_execution_time: f64,
    pub success_rate: f64,
    pub advantage_ratio: f64,
    pub last_execution: DateTime<Utc>,
    pub error_rate: f64,
}

impl CircuitMetric {
    /// Whether the circuit ran within `window` of `now`
    pub fn is_active_at(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        now.signed_duration_since(self.last_execution) < window
    }
}

/// Aggregate across every circuit the store has seen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_executions: u64,
    pub average_success_rate: f64,
    pub best_advantage_ratio: f64,
    pub active_circuits: usize,
}

impl MetricsSummary {
    /// Summarize a snapshot of circuits
    pub fn from_metrics(metrics: &[CircuitMetric], now: DateTime<Utc>, window: chrono::Duration) -> Self {
        if metrics.is_empty() {
            return Self::default();
        }

        let total_executions = metrics.iter().map(|m| m.execution_count).sum();
        let average_success_rate =
            metrics.iter().map(|m| m.success_rate).sum::<f64>() / metrics.len() as f64;
        let best_advantage_ratio = metrics
            .iter()
            .map(|m| m.advantage_ratio)
            .fold(f64::NEG_INFINITY, f64::max);
        let active_circuits = metrics.iter().filter(|m| m.is_active_at(now, window)).count();

        Self {
            total_executions,
            average_success_rate,
            best_advantage_ratio,
            active_circuits,
        }
    }
}
