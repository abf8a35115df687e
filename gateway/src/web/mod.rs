//! HTTP surface: JSON envelopes and route handlers

pub mod handlers;
pub mod response;

pub use response::{ApiError, success_envelope};
