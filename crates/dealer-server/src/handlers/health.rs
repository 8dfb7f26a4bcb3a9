use super::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use dealer_core::StoreMode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    mode: StoreMode,
    dealerships: usize,
    reviews: usize,
}

pub async fn home() -> &'static str {
    "Welcome to the Dealerships API"
}

/// Reports the store mode and record counts. A failing count means the
/// store is unusable, so it surfaces as 500.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let dealerships = state
        .store
        .count_dealerships()
        .await
        .map_err(|e| ApiError::internal("Health check failed", e))?;
    let reviews = state
        .store
        .count_reviews()
        .await
        .map_err(|e| ApiError::internal("Health check failed", e))?;

    Ok(Json(HealthResponse {
        status: "ok",
        mode: state.store.mode(),
        dealerships,
        reviews,
    }))
}
