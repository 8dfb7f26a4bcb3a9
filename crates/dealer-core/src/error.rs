//! Error types for the record stores

use dealer_types::{EntityKind, InvalidDealershipId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Seed load error: {0}")]
    SeedLoad(String),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: EntityKind, id: i64 },

    #[error("No {kind} id left after {max}")]
    IdExhausted { kind: EntityKind, max: i64 },

    #[error(transparent)]
    InvalidDealershipId(#[from] InvalidDealershipId),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl StoreError {
    /// Map a unique-constraint violation on insert to `DuplicateId`.
    pub(crate) fn on_insert(e: sqlx::Error, kind: EntityKind, id: i64) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::DuplicateId { kind, id }
            }
            _ => StoreError::Database(e),
        }
    }
}
