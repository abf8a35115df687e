//! Message types for the record optimization pipeline
//!
//! This module organizes the wire types by the component that creates them:
//! - `record`: validated domain input
//! - `optimization`: engine output
//! - `dispatch`: outcome of handing a result to the workflow executor
//! - `metrics`: per-circuit counters and their summary
//! - `trace`: execution traces forwarded to the observability sink

pub mod record;
pub mod optimization;
pub mod dispatch;
pub mod metrics;
pub mod trace;

pub use record::DomainRecord;

pub use optimization::{OptimizationResult, StateEntry};

pub use dispatch::{WorkflowDispatchOutcome, DispatchStatus};

pub use metrics::{CircuitMetric, MetricsSummary};

pub use trace::{TraceRecord, TraceMetadata, TraceMetadataSubmission, TraceSubmission};
