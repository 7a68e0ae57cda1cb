//! Structured error types with machine-readable codes
//!
//! Every API failure maps to a code, an HTTP status and a JSON body so
//! clients can branch on errors without parsing messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error response for API clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error types with proper categorization
#[derive(Debug)]
pub enum AppError {
    // Validation errors (400)
    InvalidInput { field: String, reason: String },
    InvalidEntityId(String),
    InvalidEntityType(String),

    // Not found (404)
    EntityNotFound(String),

    // Upstream data access (502)
    UpstreamData(String),

    // Generic wrapper for internal errors (500)
    Internal(anyhow::Error),
}

impl AppError {
    /// Get error code for client identification
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::InvalidEntityId(_) => "INVALID_ENTITY_ID",
            Self::InvalidEntityType(_) => "INVALID_ENTITY_TYPE",
            Self::EntityNotFound(_) => "ENTITY_NOT_FOUND",
            Self::UpstreamData(_) => "UPSTREAM_DATA_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. }
            | Self::InvalidEntityId(_)
            | Self::InvalidEntityType(_) => StatusCode::BAD_REQUEST,

            Self::EntityNotFound(_) => StatusCode::NOT_FOUND,

            Self::UpstreamData(_) => StatusCode::BAD_GATEWAY,

            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get detailed error message
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput { field, reason } => {
                format!("Invalid input for field '{field}': {reason}")
            }
            Self::InvalidEntityId(msg) => format!("Invalid entity ID: {msg}"),
            Self::InvalidEntityType(msg) => format!("Invalid entity type: {msg}"),
            Self::EntityNotFound(id) => format!("Entity not found: {id}"),
            Self::UpstreamData(msg) => format!("Upstream data error: {msg}"),
            Self::Internal(err) => format!("Internal error: {err}"),
        }
    }

    /// Convert to structured error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.message(),
            details: None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Upstream failures degrade to an empty-state UI; log here so the
        // banner the client renders has a server-side trace.
        if status.is_server_error() {
            tracing::error!(code = self.code(), "request failed: {}", self.message());
        }

        let body = self.to_response();
        (status, Json(body)).into_response()
    }
}

/// Helper trait to convert validation errors
pub trait ValidationErrorExt<T> {
    fn map_validation_err(self, field: &str) -> Result<T>;
}

impl<T> ValidationErrorExt<T> for anyhow::Result<T> {
    fn map_validation_err(self, field: &str) -> Result<T> {
        self.map_err(|e| AppError::InvalidInput {
            field: field.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
