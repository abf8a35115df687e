//! Service tests for the gateway
//!
//! External collaborators are stood in for by `wiremock` servers.

pub mod metrics_store;
