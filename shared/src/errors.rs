//! Shared error types for the record optimization pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Unknown component: {input}")]
    UnknownComponent { input: String },
}
