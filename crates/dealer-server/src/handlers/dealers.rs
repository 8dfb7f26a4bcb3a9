//! Dealership handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use dealer_core::Dealership;
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Dealership>>, ApiError> {
    match state.store.list_dealerships().await {
        Ok(dealerships) => Ok(Json(dealerships)),
        Err(e) => Err(ApiError::internal("Failed to fetch dealers", e)),
    }
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Dealership>, ApiError> {
    match state.store.find_dealership(id).await {
        Ok(Some(dealership)) => Ok(Json(dealership)),
        Ok(None) => Err(ApiError::not_found(format!("Dealer {} not found", id))),
        Err(e) => Err(ApiError::internal("Failed to fetch dealer by ID", e)),
    }
}

pub async fn by_state(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<Dealership>>, ApiError> {
    match state
        .store
        .find_dealerships_by_field("state", &Value::String(code))
        .await
    {
        Ok(dealerships) => Ok(Json(dealerships)),
        Err(e) => Err(ApiError::internal("Failed to fetch dealers by state", e)),
    }
}
