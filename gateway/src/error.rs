//! Gateway-specific error types

use std::net::SocketAddr;

use engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("HTTP server startup failed on {address}: {source}")]
    ServerStartup {
        address: SocketAddr,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid circuit identifier: {0:?}")]
    InvalidCircuit(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn config(message: impl Into<String>) -> Self {
        GatewayError::Config { message: message.into() }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
