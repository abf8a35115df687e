//! JSON response envelopes
//!
//! Every body carries `success`; failures map to a status code through
//! [`ApiError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use engine::ValidationError;
use serde_json::{Value, json};

use crate::error::GatewayError;

/// Errors that end a request
#[derive(Debug)]
pub enum ApiError {
    /// The validator rejected the record; carries every violated field
    Validation(Vec<String>),
    /// The body is not JSON
    MalformedBody,
    NotFound,
    /// Unexpected engine or store fault
    Internal { message: String, expose: bool },
}

impl ApiError {
    pub fn internal(error: &GatewayError, expose: bool) -> Self {
        ApiError::Internal {
            message: error.to_string(),
            expose,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::Validation(fields) => json!({
                "success": false,
                "error": "Invalid input",
                "details": fields,
            }),
            ApiError::MalformedBody => json!({
                "success": false,
                "error": "Malformed JSON body",
                "details": [],
            }),
            ApiError::NotFound => json!({
                "success": false,
                "error": "Not found",
            }),
            ApiError::Internal { message, expose } => {
                let mut body = json!({
                    "success": false,
                    "error": "Internal error",
                });
                if *expose {
                    body["message"] = Value::String(message.clone());
                }
                body
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.fields)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// `{ success: true, data, timestamp }`
pub fn success_envelope(data: Value) -> Value {
    json!({
        "success": true,
        "data": data,
        "timestamp": now_rfc3339(),
    })
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
