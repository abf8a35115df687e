//! Validation and optimization core
//!
//! Both halves are stateless: the [`Validator`] turns an untyped candidate
//! into a [`shared::DomainRecord`] (or the full list of violated fields), and
//! the [`OptimizationEngine`] maps a record to an
//! [`shared::OptimizationResult`] without I/O, clocks or randomness in the
//! numeric output.

pub mod error;
pub mod optimizer;
pub mod validator;

pub use error::{EngineError, EngineResult, ValidationError};
pub use optimizer::{ALGORITHM_ID, AngleParameters, CIRCUIT_DEPTH, OptimizationEngine};
pub use validator::{FieldDefaults, Validator, fields};
