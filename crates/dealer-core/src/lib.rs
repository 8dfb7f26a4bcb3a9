//! Dealer Core Library
//!
//! Dual-mode persistence for dealerships and reviews. At startup the
//! [`ConnectionSupervisor`] tries PostgreSQL once; if that fails the process
//! runs on an in-process store instead. Either way callers get an
//! `Arc<dyn RecordStore>` with the same semantics.

pub use dealer_types::*;

pub mod bootstrap;
pub mod error;
pub mod ports;
pub mod storage;
pub mod supervisor;

pub use bootstrap::{startup, BootstrapLoader, SeedDataset, SeedSummary};
pub use error::{Result, StoreError};
pub use ports::{RecordStore, StoreMode};
pub use storage::{DurableRecordStore, InMemoryRecordStore};
pub use supervisor::{ConnectionSupervisor, ModeSelection};
