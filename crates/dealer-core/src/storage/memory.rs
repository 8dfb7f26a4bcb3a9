//! In-memory record store used when PostgreSQL is unreachable at startup

use crate::ports::{RecordStore, StoreMode};
use crate::{Result, StoreError};
use async_trait::async_trait;
use dealer_types::{
    field_matches, Dealership, DealershipId, Record, Review, ReviewCandidate,
};
use serde_json::Value;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

/// Insertion-ordered records of one kind behind a single lock
struct Collection<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> Collection<T> {
    fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    async fn list(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    async fn find(&self, id: i64) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect()
    }

    async fn find_by_field(&self, field: &str, value: &Value) -> Vec<T> {
        self.filter(|r| {
            r.field(field)
                .map(|stored| field_matches(&stored, value))
                .unwrap_or(false)
        })
        .await
    }

    async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    async fn clear(&self) {
        self.records.write().await.clear();
    }

    /// Append records keeping their ids. Nothing is written if any id clashes.
    async fn extend(&self, batch: &[T]) -> Result<usize> {
        let mut records = self.records.write().await;
        let mut seen: HashSet<i64> = records.iter().map(Record::id).collect();
        for record in batch {
            if !seen.insert(record.id()) {
                return Err(StoreError::DuplicateId {
                    kind: T::KIND,
                    id: record.id(),
                });
            }
        }
        records.extend_from_slice(batch);
        Ok(batch.len())
    }

    /// Assign `max id + 1` and append, under one write guard.
    async fn append_next<F>(&self, build: F) -> Result<T>
    where
        F: FnOnce(i64) -> T + Send,
    {
        let mut records = self.records.write().await;
        let max_id = records.iter().map(Record::id).max().unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or(StoreError::IdExhausted {
            kind: T::KIND,
            max: max_id,
        })?;
        let record = build(next_id);
        records.push(record.clone());
        Ok(record)
    }
}

/// Owned dealership and review collections for a single process lifetime
pub struct InMemoryRecordStore {
    dealerships: Collection<Dealership>,
    reviews: Collection<Review>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            dealerships: Collection::new(),
            reviews: Collection::new(),
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn mode(&self) -> StoreMode {
        StoreMode::InMemory
    }

    async fn list_dealerships(&self) -> Result<Vec<Dealership>> {
        Ok(self.dealerships.list().await)
    }

    async fn find_dealership(&self, id: i64) -> Result<Option<Dealership>> {
        Ok(self.dealerships.find(id).await)
    }

    async fn find_dealerships_by_field(
        &self,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Dealership>> {
        debug!("In-memory dealership lookup: {} = {}", field, value);
        Ok(self.dealerships.find_by_field(field, value).await)
    }

    async fn count_dealerships(&self) -> Result<usize> {
        Ok(self.dealerships.len().await)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        Ok(self.reviews.list().await)
    }

    async fn find_review(&self, id: i64) -> Result<Option<Review>> {
        Ok(self.reviews.find(id).await)
    }

    async fn find_reviews_by_field(&self, field: &str, value: &Value) -> Result<Vec<Review>> {
        debug!("In-memory review lookup: {} = {}", field, value);
        Ok(self.reviews.find_by_field(field, value).await)
    }

    async fn find_reviews_by_dealership(&self, dealership: DealershipId) -> Result<Vec<Review>> {
        Ok(self.reviews.filter(|r| r.dealership == dealership).await)
    }

    async fn count_reviews(&self) -> Result<usize> {
        Ok(self.reviews.len().await)
    }

    async fn insert_review(&self, candidate: ReviewCandidate) -> Result<Review> {
        let review = self
            .reviews
            .append_next(|id| Review::from_candidate(id, candidate))
            .await?;
        debug!(
            "Inserted review {} for dealership {}",
            review.id, review.dealership
        );
        Ok(review)
    }

    async fn clear(&self) -> Result<()> {
        self.reviews.clear().await;
        self.dealerships.clear().await;
        Ok(())
    }

    async fn bulk_insert_dealerships(&self, dealerships: &[Dealership]) -> Result<usize> {
        self.dealerships.extend(dealerships).await
    }

    async fn bulk_insert_reviews(&self, reviews: &[Review]) -> Result<usize> {
        self.reviews.extend(reviews).await
    }
}
