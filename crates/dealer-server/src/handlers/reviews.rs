//! Review handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use dealer_core::{DealershipId, Review, ReviewCandidate};
use tracing::info;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    match state.store.list_reviews().await {
        Ok(reviews) => Ok(Json(reviews)),
        Err(e) => Err(ApiError::internal("Error fetching reviews", e)),
    }
}

pub async fn by_dealer(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let dealership: DealershipId = raw_id
        .parse()
        .map_err(|e: dealer_core::InvalidDealershipId| ApiError::bad_request(e.to_string()))?;

    match state.store.find_reviews_by_dealership(dealership).await {
        Ok(reviews) => Ok(Json(reviews)),
        Err(e) => Err(ApiError::internal("Error fetching reviews", e)),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(candidate): Json<ReviewCandidate>,
) -> Result<Json<Review>, ApiError> {
    candidate
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    match state.store.insert_review(candidate).await {
        Ok(review) => {
            info!(
                "Review {} posted for dealership {}",
                review.id, review.dealership
            );
            Ok(Json(review))
        }
        Err(e) => Err(ApiError::internal("Error inserting review", e)),
    }
}
