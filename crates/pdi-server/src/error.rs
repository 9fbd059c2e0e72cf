//! Server-specific error types
//!
//! Ingestion failures of every kind reach the caller the same way: HTTP 500
//! with a `detail` message. Only malformed request bodies, which are
//! rejected before any ingestion work starts, get a different status.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdi_common::{TimestampParseError, ValidationError};
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::db::StoreError;

/// Anything that can go wrong while ingesting a record
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Timestamp(#[from] TimestampParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type returned by HTTP handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("{0}")]
    InvalidBody(String),

    #[error("{0}")]
    Unavailable(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Ingest(IngestError::Store(err))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Ingest(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        match &self {
            AppError::Ingest(IngestError::Store(e)) => {
                tracing::error!(error = ?e, "Store error during ingestion");
            }
            AppError::Ingest(e) => tracing::error!(error = %e, "Ingestion failed"),
            AppError::InvalidBody(_) => tracing::debug!(detail = %detail, "Rejected request body"),
            AppError::Unavailable(_) => tracing::warn!(detail = %detail, "Store unavailable"),
        }

        (status, Json(ErrorResponse::new(detail))).into_response()
    }
}
