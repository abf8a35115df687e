//! Route handlers
//!
//! Each handler is generic over the injected services so the router can be
//! driven with mocks.

pub mod health;
pub mod metrics;
pub mod optimize;
pub mod trace;

use crate::web::ApiError;

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
