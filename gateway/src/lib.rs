//! Record optimization gateway
//!
//! HTTP front end for the validator and optimization engine: every accepted
//! record is optimized, recorded in the metrics store and handed to an
//! external workflow executor, with traces forwarded to an optional
//! observability sink.

pub mod config;
pub mod error;
pub mod gateway_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use config::{Args, DispatchConfig, DispatchMode, GatewayConfig, MetricsConfig, TraceSinkConfig};
pub use error::{GatewayError, GatewayResult};
pub use gateway_impl::Gateway;
pub use state::GatewayState;
pub use types::*;

// Re-export trait definitions
pub use traits::{MetricsStore, TraceRecorder, WorkflowDispatcher};

// Re-export service implementations
pub use services::{InMemoryMetricsStore, RealTraceRecorder, RealWorkflowDispatcher};
