//! Shared types for the record optimization pipeline
//!
//! Contains the wire types exchanged between the validator, the engine,
//! the gateway services and external collaborators (workflow executor and
//! trace sink), plus the logging helpers every binary uses.

pub mod types;
pub mod errors;
pub mod logging;
pub mod messages;

pub use types::*;
pub use errors::*;

pub use messages::{
    // Domain input
    DomainRecord,

    // Engine output
    OptimizationResult, StateEntry,

    // Dispatch
    WorkflowDispatchOutcome, DispatchStatus,

    // Metrics
    CircuitMetric, MetricsSummary,

    // Traces
    TraceRecord, TraceMetadata, TraceMetadataSubmission, TraceSubmission,
};
