//! Core identifiers used throughout the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SharedError;

/// Identifier for the pipeline component emitting a log line or owning a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentId {
    /// Input validation
    Validator,
    /// Deterministic optimization transform
    Engine,
    /// Outbound workflow dispatch
    Dispatcher,
    /// Per-circuit metrics store
    Metrics,
    /// Trace forwarding
    Tracer,
    /// HTTP surface
    Gateway,
}

impl ComponentId {
    pub const ALL: [ComponentId; 6] = [
        ComponentId::Validator,
        ComponentId::Engine,
        ComponentId::Dispatcher,
        ComponentId::Metrics,
        ComponentId::Tracer,
        ComponentId::Gateway,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentId::Validator => "validator",
            ComponentId::Engine => "engine",
            ComponentId::Dispatcher => "dispatcher",
            ComponentId::Metrics => "metrics",
            ComponentId::Tracer => "tracer",
            ComponentId::Gateway => "gateway",
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComponentId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ComponentId::ALL
            .into_iter()
            .find(|component| component.as_str() == lowered)
            .ok_or_else(|| SharedError::UnknownComponent { input: s.to_string() })
    }
}
