//! Request-path error taxonomy and its mapping onto HTTP responses.
//!
//! Every error body has the shape `{"detail": ...}`. Validation errors carry
//! a list of field-level entries; store and internal faults carry a fixed
//! message so connection strings and driver text never reach the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::query::ShapeError;
use crate::store::StoreError;

// ---

pub const SENSOR_NOT_FOUND: &str = "Sensor not found";

pub const DATABASE_ERROR_DETAIL: &str =
    "A database error occurred. This might be due to missing tables or connection issues.";

pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// One entry of a 422 response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path to the offending input, e.g. `["body", "end_date"]`.
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        ApiError::Validation(vec![FieldError::new(loc, msg, kind)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ShapeError> for ApiError {
    fn from(err: ShapeError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let status = self.status();
        let detail = match &self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::NotFound(message) => json!(message),
            ApiError::Store(err) => {
                error!("Database error: {}", err);
                json!(DATABASE_ERROR_DETAIL)
            }
            ApiError::Internal(message) => {
                error!("Internal error: {}", message);
                json!(INTERNAL_ERROR_DETAIL)
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
