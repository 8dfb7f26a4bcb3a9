//! Seed data loading and the startup sequence

use crate::ports::RecordStore;
use crate::supervisor::ConnectionSupervisor;
use crate::{Result, StoreError};
use dealer_types::{Dealership, Record, Review};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

pub const DEALERSHIPS_FILE: &str = "dealerships.json";
pub const REVIEWS_FILE: &str = "reviews.json";

#[derive(Deserialize)]
struct DealershipsFile {
    dealerships: Vec<Dealership>,
}

#[derive(Deserialize)]
struct ReviewsFile {
    reviews: Vec<Review>,
}

/// The static base dataset every process starts from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedDataset {
    pub dealerships: Vec<Dealership>,
    pub reviews: Vec<Review>,
}

impl SeedDataset {
    /// Read `dealerships.json` and `reviews.json` from `dir`.
    ///
    /// A missing or malformed file is a `SeedLoad` error; the process cannot
    /// serve without a base dataset. A repeated id counts as malformed.
    pub async fn load(dir: &Path) -> Result<Self> {
        info!("Loading seed data from {}", dir.display());

        let dealerships: DealershipsFile = read_seed_file(&dir.join(DEALERSHIPS_FILE)).await?;
        let reviews: ReviewsFile = read_seed_file(&dir.join(REVIEWS_FILE)).await?;
        let dataset = Self::checked(dealerships.dealerships, reviews.reviews)?;

        info!(
            "Seed data loaded: {} dealerships, {} reviews",
            dataset.dealerships.len(),
            dataset.reviews.len()
        );

        Ok(dataset)
    }

    /// Parse both seed documents from strings.
    pub fn from_json(dealerships: &str, reviews: &str) -> Result<Self> {
        let dealerships: DealershipsFile = serde_json::from_str(dealerships)
            .map_err(|e| StoreError::SeedLoad(format!("{}: {}", DEALERSHIPS_FILE, e)))?;
        let reviews: ReviewsFile = serde_json::from_str(reviews)
            .map_err(|e| StoreError::SeedLoad(format!("{}: {}", REVIEWS_FILE, e)))?;
        Self::checked(dealerships.dealerships, reviews.reviews)
    }

    fn checked(dealerships: Vec<Dealership>, reviews: Vec<Review>) -> Result<Self> {
        ensure_unique_ids(DEALERSHIPS_FILE, &dealerships)?;
        ensure_unique_ids(REVIEWS_FILE, &reviews)?;
        Ok(Self {
            dealerships,
            reviews,
        })
    }
}

fn ensure_unique_ids<T: Record>(file: &str, records: &[T]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    match records.iter().find(|r| !seen.insert(r.id())) {
        Some(dup) => Err(StoreError::SeedLoad(format!(
            "{}: duplicate {} id {}",
            file,
            T::KIND,
            dup.id()
        ))),
        None => Ok(()),
    }
}

async fn read_seed_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| StoreError::SeedLoad(format!("{}: {}", path.display(), e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::SeedLoad(format!("{}: {}", path.display(), e)))
}

/// Record counts written by a seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub dealerships: usize,
    pub reviews: usize,
}

/// Clears a store and repopulates it from the seed dataset
pub struct BootstrapLoader {
    dataset: SeedDataset,
}

impl BootstrapLoader {
    pub fn new(dataset: SeedDataset) -> Self {
        Self { dataset }
    }

    /// Clear both kinds, then bulk-insert reviews and dealerships with their
    /// seed ids. Stops at the first failure.
    pub async fn seed(&self, store: &dyn RecordStore) -> Result<SeedSummary> {
        info!("Clearing {} store and inserting seed data...", store.mode());
        store.clear().await?;

        let reviews = store.bulk_insert_reviews(&self.dataset.reviews).await?;
        info!("Inserted {} reviews", reviews);

        let dealerships = store
            .bulk_insert_dealerships(&self.dataset.dealerships)
            .await?;
        info!("Inserted {} dealerships", dealerships);

        Ok(SeedSummary {
            dealerships,
            reviews,
        })
    }
}

/// Select the backend once, seed it once, and hand back the store.
///
/// A seeding failure is logged and the selected store is returned anyway:
/// it does not trigger a fallback and is not retried.
pub async fn startup(
    supervisor: ConnectionSupervisor,
    dataset: SeedDataset,
) -> Arc<dyn RecordStore> {
    let selection = supervisor.select_mode().await;
    let mode = selection.mode();
    let store = selection.into_store();

    match BootstrapLoader::new(dataset).seed(store.as_ref()).await {
        Ok(summary) => info!(
            "Seeded {} store: {} dealerships, {} reviews",
            mode, summary.dealerships, summary.reviews
        ),
        Err(e) => error!("Error seeding {} store: {}", mode, e),
    }

    store
}
