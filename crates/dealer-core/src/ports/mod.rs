//! Port traits (interfaces) for dependency injection

pub mod record_store;

pub use record_store::{RecordStore, StoreMode};
