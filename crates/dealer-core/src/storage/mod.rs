//! Storage layer
//!
//! PostgreSQL when it answers at startup, otherwise owned in-process
//! collections. Both implement [`crate::ports::RecordStore`].

pub mod db;
pub mod memory;

pub use db::DurableRecordStore;
pub use memory::InMemoryRecordStore;
