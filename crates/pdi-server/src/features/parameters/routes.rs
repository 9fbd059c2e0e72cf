//! Parameter ingestion routes

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use super::commands::{
    insert, insert_batch, insert_json, InsertBatchCommand, InsertBatchResponse,
    InsertJsonCommand, InsertJsonResponse, InsertParametersCommand, InsertParametersResponse,
};
use crate::error::AppError;
use crate::features::SharedStore;

/// Create parameter routes
pub fn parameters_routes() -> Router<SharedStore> {
    Router::new()
        .route("/parameters", post(insert_parameters))
        .route("/parameters/json", post(insert_parameters_json))
        .route("/parameters/batch", post(insert_parameters_batch))
}

/// Insert one decoded reading
///
/// POST /api/parameters
async fn insert_parameters(
    State(store): State<SharedStore>,
    payload: Result<Json<InsertParametersCommand>, JsonRejection>,
) -> Result<Json<InsertParametersResponse>, AppError> {
    let Json(command) = payload?;
    let response = insert::handle(store.as_ref(), command).await?;
    Ok(Json(response))
}

/// Insert an arbitrary JSON object
///
/// POST /api/parameters/json
async fn insert_parameters_json(
    State(store): State<SharedStore>,
    payload: Result<Json<InsertJsonCommand>, JsonRejection>,
) -> Result<Json<InsertJsonResponse>, AppError> {
    let Json(command) = payload?;
    let response = insert_json::handle(store.as_ref(), command).await?;
    Ok(Json(response))
}

/// Insert many readings in one transaction
///
/// POST /api/parameters/batch
async fn insert_parameters_batch(
    State(store): State<SharedStore>,
    payload: Result<Json<InsertBatchCommand>, JsonRejection>,
) -> Result<Json<InsertBatchResponse>, AppError> {
    let Json(command) = payload?;
    let response = insert_batch::handle(store.as_ref(), command).await?;
    Ok(Json(response))
}
