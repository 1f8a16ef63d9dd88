//! Typed error handling for the grid engine
//!
//! Only failures the engine cannot answer itself are errors. A failing
//! operation callback or an unknown operation code is turned into a reply
//! by the result composer and never surfaces here.
//!
//! # Error Categories
//!
//! - [`GridError::Validation`]: request values could not be bound
//! - [`GridError::Config`]: the engine was wired incorrectly
//! - [`GridError::Source`]: a data source call failed
//! - [`GridError::MethodNotAllowed`]: the GET policy refused the request
//!
//! # Example
//!
//! ```rust,ignore
//! match engine.execute(&values).await {
//!     Ok(reply) => reply.into_response(),
//!     Err(GridError::Validation { state, .. }) => {
//!         tracing::debug!(%state, "rejected grid request");
//!         StatusCode::BAD_REQUEST.into_response()
//!     }
//!     Err(e) => e.into_response(),
//! }
//! ```

use crate::core::validation::ValidationState;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type of the engine
#[derive(Debug, Error)]
pub enum GridError {
    /// Binding the grid request or a row model failed
    #[error("Error binding {context}: {state}")]
    Validation {
        context: String,
        state: ValidationState,
    },

    /// Wiring defect, not retried
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Data source or repository failure
    #[error(transparent)]
    Source(anyhow::Error),

    /// The GET policy refused the request
    #[error("{method} requests are not allowed for this grid")]
    MethodNotAllowed { method: String },
}

/// Engine configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No callback and no native data source support for an operation
    #[error("No repository or {operation} function configured")]
    MissingOperation { operation: String },

    /// A record schema without fields cannot provide a default sort key
    #[error("Record type '{record}' declares no accessible fields")]
    NoAccessibleFields { record: String },
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl GridError {
    pub fn validation(context: impl Into<String>, state: ValidationState) -> Self {
        GridError::Validation {
            context: context.into(),
            state,
        }
    }

    pub fn missing_operation(operation: impl Into<String>) -> Self {
        ConfigError::MissingOperation {
            operation: operation.into(),
        }
        .into()
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GridError::Validation { .. } => StatusCode::BAD_REQUEST,
            GridError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GridError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GridError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GridError::Validation { .. } => "VALIDATION_ERROR",
            GridError::Config(_) => "CONFIG_ERROR",
            GridError::Source(_) => "SOURCE_ERROR",
            GridError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            GridError::Validation { state, .. } => Some(serde_json::json!({ "fields": state })),
            _ => None,
        }
    }
}

/// Data sources report through `anyhow`; grid errors raised inside a
/// source keep their category.
impl From<anyhow::Error> for GridError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<GridError>() {
            Ok(grid) => grid,
            Err(err) => GridError::Source(err),
        }
    }
}

impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        match &self {
            GridError::Config(_) | GridError::Source(_) => {
                tracing::error!(error = %self, code = self.error_code(), "Grid request failed");
            }
            _ => {
                tracing::debug!(error = %self, code = self.error_code(), "Grid request rejected");
            }
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
