//! Record store trait shared by the durable and in-memory backends

use crate::Result;
use async_trait::async_trait;
use dealer_types::{Dealership, DealershipId, Review, ReviewCandidate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which backend serves the process. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
    Durable,
    InMemory,
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreMode::Durable => write!(f, "durable"),
            StoreMode::InMemory => write!(f, "in_memory"),
        }
    }
}

/// Uniform access to dealerships and reviews.
///
/// Both implementations return records in insertion order and agree on
/// content. Lookups that find nothing return `Ok(None)` or an empty `Vec`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn mode(&self) -> StoreMode;

    // Dealerships
    async fn list_dealerships(&self) -> Result<Vec<Dealership>>;
    async fn find_dealership(&self, id: i64) -> Result<Option<Dealership>>;
    async fn find_dealerships_by_field(&self, field: &str, value: &Value)
        -> Result<Vec<Dealership>>;
    async fn count_dealerships(&self) -> Result<usize>;

    // Reviews
    async fn list_reviews(&self) -> Result<Vec<Review>>;
    async fn find_review(&self, id: i64) -> Result<Option<Review>>;
    async fn find_reviews_by_field(&self, field: &str, value: &Value) -> Result<Vec<Review>>;
    async fn find_reviews_by_dealership(&self, dealership: DealershipId) -> Result<Vec<Review>>;
    async fn count_reviews(&self) -> Result<usize>;

    /// Store a new review with id `max(existing ids, 0) + 1`.
    ///
    /// The max scan and the append are atomic with respect to other inserts.
    async fn insert_review(&self, candidate: ReviewCandidate) -> Result<Review>;

    // Seeding. Ids come from the seed data and bypass id assignment.
    async fn clear(&self) -> Result<()>;
    async fn bulk_insert_dealerships(&self, dealerships: &[Dealership]) -> Result<usize>;
    async fn bulk_insert_reviews(&self, reviews: &[Review]) -> Result<usize>;
}
