//! Service trait definitions for dependency injection
//!
//! All I/O and shared state sit behind these traits so handlers can be
//! exercised with mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{CircuitMetric, DomainRecord, MetricsSummary, OptimizationResult, TraceRecord, WorkflowDispatchOutcome};

use crate::config::DispatchMode;
use crate::error::GatewayResult;
use crate::types::{DispatchAttempt, ExecutionSample};

/// Hands optimization results to the external workflow executor
#[mockall::automock]
#[async_trait]
pub trait WorkflowDispatcher: Send + Sync {
    /// Deliver a result; failures come back as a `failed` outcome, never an error
    async fn dispatch(
        &self,
        request_id: &str,
        record: &DomainRecord,
        result: &OptimizationResult,
    ) -> WorkflowDispatchOutcome;

    /// Most recent completed delivery, if any
    async fn last_attempt(&self) -> Option<DispatchAttempt>;

    /// Wait for detached deliveries still in flight; returns how many finished
    async fn drain(&self) -> usize;

    /// Whether an executor endpoint is configured
    fn is_configured(&self) -> bool;

    fn mode(&self) -> DispatchMode;

    fn timeout_ms(&self) -> u64;
}

/// Per-circuit execution counters
#[mockall::automock]
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Record one execution without an advantage sample
    async fn record(&self, circuit_id: &str, execution_time_ms: u64, succeeded: bool) -> GatewayResult<()>;

    /// Record one execution
    async fn record_execution(&self, circuit_id: &str, sample: ExecutionSample) -> GatewayResult<()>;

    /// Consistent copy of every circuit, sorted by id
    async fn snapshot(&self) -> GatewayResult<Vec<CircuitMetric>>;

    /// Single circuit lookup
    async fn circuit(&self, circuit_id: &str) -> GatewayResult<Option<CircuitMetric>>;

    /// Aggregate as of `now`
    async fn summary_at(&self, now: DateTime<Utc>) -> GatewayResult<MetricsSummary>;

    /// Snapshot and the summary computed from that same snapshot
    async fn report_at(&self, now: DateTime<Utc>) -> GatewayResult<(Vec<CircuitMetric>, MetricsSummary)>;
}

/// Best-effort forwarding of execution traces
#[mockall::automock]
#[async_trait]
pub trait TraceRecorder: Send + Sync {
    /// Returns whether the sink accepted the trace; never fails
    async fn record(&self, trace: &TraceRecord) -> bool;

    fn is_configured(&self) -> bool;

    fn has_credential(&self) -> bool;
}
