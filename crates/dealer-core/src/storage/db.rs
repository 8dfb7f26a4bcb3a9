//! PostgreSQL record store
//!
//! Each record is stored whole as `JSONB` so descriptive fields round-trip
//! unchanged. `id` is a unique column and `seq` records insertion order.
//!
//! ```sql
//! CREATE TABLE dealerships (
//!     seq BIGSERIAL PRIMARY KEY,
//!     id BIGINT NOT NULL UNIQUE,
//!     state TEXT NOT NULL,
//!     doc JSONB NOT NULL
//! );
//! CREATE TABLE reviews (
//!     seq BIGSERIAL PRIMARY KEY,
//!     id BIGINT NOT NULL UNIQUE,
//!     dealership BIGINT NOT NULL,
//!     doc JSONB NOT NULL
//! );
//! ```

use crate::ports::{RecordStore, StoreMode};
use crate::{Result, StoreError};
use async_trait::async_trait;
use dealer_types::{Dealership, DealershipId, EntityKind, Review, ReviewCandidate};
use serde_json::Value;
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct DurableRecordStore {
    pool: PgPool,
}

impl DurableRecordStore {
    /// Wrap a connected pool and make sure the schema exists.
    pub async fn new(pool: PgPool) -> Result<Self> {
        Self::run_migrations(&pool).await?;
        info!("PostgreSQL schema ready");
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dealerships (
                seq BIGSERIAL PRIMARY KEY,
                id BIGINT NOT NULL UNIQUE,
                state TEXT NOT NULL,
                doc JSONB NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_dealerships_state ON dealerships(state)")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reviews (
                seq BIGSERIAL PRIMARY KEY,
                id BIGINT NOT NULL UNIQUE,
                dealership BIGINT NOT NULL,
                doc JSONB NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_dealership ON reviews(dealership)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

fn unwrap_docs<T>(rows: Vec<Json<T>>) -> Vec<T> {
    rows.into_iter().map(|Json(doc)| doc).collect()
}

#[async_trait]
impl RecordStore for DurableRecordStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Durable
    }

    async fn list_dealerships(&self) -> Result<Vec<Dealership>> {
        let rows: Vec<Json<Dealership>> =
            sqlx::query_scalar("SELECT doc FROM dealerships ORDER BY seq")
                .fetch_all(&self.pool)
                .await?;
        Ok(unwrap_docs(rows))
    }

    async fn find_dealership(&self, id: i64) -> Result<Option<Dealership>> {
        let row: Option<Json<Dealership>> =
            sqlx::query_scalar("SELECT doc FROM dealerships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|Json(d)| d))
    }

    async fn find_dealerships_by_field(
        &self,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Dealership>> {
        debug!("PostgreSQL dealership lookup: {} = {}", field, value);
        let rows: Vec<Json<Dealership>> =
            sqlx::query_scalar("SELECT doc FROM dealerships WHERE doc -> $1 = $2 ORDER BY seq")
                .bind(field)
                .bind(Json(value))
                .fetch_all(&self.pool)
                .await?;
        Ok(unwrap_docs(rows))
    }

    async fn count_dealerships(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dealerships")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        let rows: Vec<Json<Review>> = sqlx::query_scalar("SELECT doc FROM reviews ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;
        Ok(unwrap_docs(rows))
    }

    async fn find_review(&self, id: i64) -> Result<Option<Review>> {
        let row: Option<Json<Review>> = sqlx::query_scalar("SELECT doc FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(r)| r))
    }

    async fn find_reviews_by_field(&self, field: &str, value: &Value) -> Result<Vec<Review>> {
        debug!("PostgreSQL review lookup: {} = {}", field, value);
        let rows: Vec<Json<Review>> =
            sqlx::query_scalar("SELECT doc FROM reviews WHERE doc -> $1 = $2 ORDER BY seq")
                .bind(field)
                .bind(Json(value))
                .fetch_all(&self.pool)
                .await?;
        Ok(unwrap_docs(rows))
    }

    async fn find_reviews_by_dealership(&self, dealership: DealershipId) -> Result<Vec<Review>> {
        let rows: Vec<Json<Review>> =
            sqlx::query_scalar("SELECT doc FROM reviews WHERE dealership = $1 ORDER BY seq")
                .bind(dealership.get())
                .fetch_all(&self.pool)
                .await?;
        Ok(unwrap_docs(rows))
    }

    async fn count_reviews(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn insert_review(&self, candidate: ReviewCandidate) -> Result<Review> {
        let mut tx = self.pool.begin().await?;

        // EXCLUSIVE still admits readers but serializes concurrent inserts,
        // including ones from other processes sharing the database.
        sqlx::query("LOCK TABLE reviews IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let max_id: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM reviews")
            .fetch_one(&mut *tx)
            .await?;
        let max_id = max_id.unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or(StoreError::IdExhausted {
            kind: EntityKind::Review,
            max: max_id,
        })?;
        let review = Review::from_candidate(next_id, candidate);

        sqlx::query("INSERT INTO reviews (id, dealership, doc) VALUES ($1, $2, $3)")
            .bind(review.id)
            .bind(review.dealership.get())
            .bind(Json(&review))
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::on_insert(e, EntityKind::Review, review.id))?;

        tx.commit().await?;

        debug!(
            "Inserted review {} for dealership {}",
            review.id, review.dealership
        );
        Ok(review)
    }

    async fn clear(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM reviews").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM dealerships")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn bulk_insert_dealerships(&self, dealerships: &[Dealership]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for dealership in dealerships {
            sqlx::query("INSERT INTO dealerships (id, state, doc) VALUES ($1, $2, $3)")
                .bind(dealership.id)
                .bind(&dealership.state)
                .bind(Json(dealership))
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::on_insert(e, EntityKind::Dealership, dealership.id))?;
        }
        tx.commit().await?;
        Ok(dealerships.len())
    }

    async fn bulk_insert_reviews(&self, reviews: &[Review]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for review in reviews {
            sqlx::query("INSERT INTO reviews (id, dealership, doc) VALUES ($1, $2, $3)")
                .bind(review.id)
                .bind(review.dealership.get())
                .bind(Json(review))
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::on_insert(e, EntityKind::Review, review.id))?;
        }
        tx.commit().await?;
        Ok(reviews.len())
    }
}
