//! Engine error types

use thiserror::Error;

/// Every field the validator rejected, in rule order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid input: {}", fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<String>,
}

impl ValidationError {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Optimization produced a non-finite {field}")]
    NonFinite {
        field: &'static str,
        /// Engine time spent before the overflow was detected
        execution_time_ms: u64,
    },
}

impl EngineError {
    /// Engine time consumed by the failed run; zero when the engine never ran
    pub fn execution_time_ms(&self) -> u64 {
        match self {
            EngineError::NonFinite { execution_time_ms, .. } => *execution_time_ms,
            EngineError::Validation(_) => 0,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
