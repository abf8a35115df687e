//! In-memory metrics store
//!
//! Each circuit's counters live behind their own mutex, so concurrent
//! executions of different circuits never contend and every read of a circuit
//! sees all of its fields from the same update. The outer map lock is only
//! held to look up or insert a circuit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{CircuitMetric, ComponentId, MetricsSummary, component_debug};
use tokio::sync::{Mutex, RwLock};

use crate::error::{GatewayError, GatewayResult};
use crate::traits::MetricsStore;
use crate::types::ExecutionSample;

/// Raw counters for one circuit
#[derive(Debug, Clone)]
struct CircuitState {
    execution_count: u64,
    successes: u64,
    average_execution_time: f64,
    advantage_ratio: f64,
    advantage_samples: u64,
    last_execution: DateTime<Utc>,
}

impl CircuitState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            execution_count: 0,
            successes: 0,
            average_execution_time: 0.0,
            advantage_ratio: 1.0,
            advantage_samples: 0,
            last_execution: now,
        }
    }

    fn apply(&mut self, sample: ExecutionSample, now: DateTime<Utc>) {
        self.execution_count += 1;
        if sample.succeeded {
            self.successes += 1;
        }

        let count = self.execution_count as f64;
        self.average_execution_time += (sample.execution_time_ms as f64 - self.average_execution_time) / count;

        if let (true, Some(factor)) = (sample.succeeded, sample.advantage_factor) {
            if factor.is_finite() {
                self.advantage_samples += 1;
                self.advantage_ratio += (factor - self.advantage_ratio) / self.advantage_samples as f64;
            }
        }

        self.last_execution = now;
    }

    fn to_metric(&self, circuit_id: &str) -> CircuitMetric {
        let count = self.execution_count as f64;
        CircuitMetric {
            circuit_id: circuit_id.to_string(),
            execution_count: self.execution_count,
            average_execution_time: self.average_execution_time,
            success_rate: self.successes as f64 / count,
            advantage_ratio: self.advantage_ratio,
            last_execution: self.last_execution,
            error_rate: (self.execution_count - self.successes) as f64 / count,
        }
    }
}

/// Process-lifetime metrics store; circuits are never removed
#[derive(Clone)]
pub struct InMemoryMetricsStore {
    circuits: Arc<RwLock<HashMap<String, Arc<Mutex<CircuitState>>>>>,
    active_window: chrono::Duration,
}

impl InMemoryMetricsStore {
    pub fn new(active_window: Duration) -> Self {
        Self {
            circuits: Arc::new(RwLock::new(HashMap::new())),
            active_window: chrono::Duration::from_std(active_window).unwrap_or(chrono::Duration::MAX),
        }
    }

    async fn circuit_handle(&self, circuit_id: &str) -> Arc<Mutex<CircuitState>> {
        if let Some(existing) = self.circuits.read().await.get(circuit_id) {
            return existing.clone();
        }

        let mut circuits = self.circuits.write().await;
        circuits
            .entry(circuit_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(CircuitState::new(Utc::now()))))
            .clone()
    }
}

impl Default for InMemoryMetricsStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(3_600))
    }
}

#[async_trait]
impl MetricsStore for InMemoryMetricsStore {
    async fn record(&self, circuit_id: &str, execution_time_ms: u64, succeeded: bool) -> GatewayResult<()> {
        let sample = ExecutionSample {
            execution_time_ms,
            succeeded,
            advantage_factor: None,
        };
        self.record_execution(circuit_id, sample).await
    }

    async fn record_execution(&self, circuit_id: &str, sample: ExecutionSample) -> GatewayResult<()> {
        if circuit_id.trim().is_empty() {
            return Err(GatewayError::InvalidCircuit(circuit_id.to_string()));
        }

        let handle = self.circuit_handle(circuit_id).await;
        let mut state = handle.lock().await;
        state.apply(sample, Utc::now());

        component_debug!(
            ComponentId::Metrics,
            circuit = circuit_id,
            count = state.execution_count,
            succeeded = sample.succeeded,
            "Recorded execution"
        );
        Ok(())
    }

    async fn snapshot(&self) -> GatewayResult<Vec<CircuitMetric>> {
        let circuits = self.circuits.read().await;
        let mut metrics = Vec::with_capacity(circuits.len());

        for (circuit_id, handle) in circuits.iter() {
            let state = handle.lock().await;
            // Inserted but not yet updated by its first execution
            if state.execution_count > 0 {
                metrics.push(state.to_metric(circuit_id));
            }
        }

        metrics.sort_by(|a, b| a.circuit_id.cmp(&b.circuit_id));
        Ok(metrics)
    }

    async fn circuit(&self, circuit_id: &str) -> GatewayResult<Option<CircuitMetric>> {
        let handle = self.circuits.read().await.get(circuit_id).cloned();
        let Some(handle) = handle else {
            return Ok(None);
        };

        let state = handle.lock().await;
        Ok((state.execution_count > 0).then(|| state.to_metric(circuit_id)))
    }

    async fn summary_at(&self, now: DateTime<Utc>) -> GatewayResult<MetricsSummary> {
        let (_, summary) = self.report_at(now).await?;
        Ok(summary)
    }

    async fn report_at(&self, now: DateTime<Utc>) -> GatewayResult<(Vec<CircuitMetric>, MetricsSummary)> {
        let metrics = self.snapshot().await?;
        let summary = MetricsSummary::from_metrics(&metrics, now, self.active_window);
        Ok((metrics, summary))
    }
}
