//! Service implementations
//!
//! Real implementations of the service traits used by the gateway binary

pub mod metrics_store;
pub mod trace_recorder;
pub mod workflow_dispatcher;

#[cfg(test)]
mod tests;

// Re-export service implementations
pub use metrics_store::InMemoryMetricsStore;
pub use trace_recorder::RealTraceRecorder;
pub use workflow_dispatcher::{DispatchPayload, RealWorkflowDispatcher};
