//! Unified error types for the item registry service.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::api::validation::ValidationErrors;
use crate::registry::ItemId;

/// Body returned for every internal failure. Carries no internal detail.
pub const INTERNAL_ERROR_DETAIL: &str = "An internal error occurred";

/// Startup and process-level errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Prometheus recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Item registry storage errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A writer panicked while holding the registry lock.
    #[error("registry lock poisoned")]
    LockPoisoned,

    /// No IDs remain after `last`.
    #[error("item id space exhausted after {last}")]
    IdSpaceExhausted {
        /// Last ID that could be handed out.
        last: ItemId,
    },
}

/// Errors surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body violates the item schema.
    #[error("request validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Request body could not be read.
    #[error("unreadable request body: {0}")]
    Body(#[from] BytesRejection),

    /// Unexpected failure inside the registry.
    #[error("registry failure: {0}")]
    Internal(#[from] RegistryError),
}

/// Opaque error body: `{"detail": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Human-readable error summary.
    pub detail: String,
}

impl ErrorDetail {
    /// The generic internal error body.
    pub fn internal() -> Self {
        Self {
            detail: INTERNAL_ERROR_DETAIL.to_string(),
        }
    }
}

/// Opaque 500 response shared by the error types and the panic boundary.
pub fn internal_error_response() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorDetail::internal())).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                debug!(errors = errors.count(), "Rejected invalid request body");
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors.into_body())).into_response()
            }
            ApiError::Body(rejection) => {
                debug!(error = %rejection, "Failed to read request body");
                rejection.into_response()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "Internal error while handling request");
                internal_error_response()
            }
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
