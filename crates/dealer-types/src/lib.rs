//! Dealer Types - Pure record definitions
//!
//! Dealerships, reviews and the identifiers that link them. This crate has no
//! async runtime or database dependencies so both store variants and the HTTP
//! layer can share it.

pub mod dealership;
pub mod dealership_id;
pub mod review;

pub use dealership::*;
pub use dealership_id::*;
pub use review::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The two record kinds held by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Dealership,
    Review,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Dealership => write!(f, "dealership"),
            EntityKind::Review => write!(f, "review"),
        }
    }
}

/// A stored record with an integer id and JSON-addressable fields.
pub trait Record: Serialize + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> i64;

    /// Value of a top-level field as it appears in the record's JSON form.
    fn field(&self, name: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove(name),
            _ => None,
        }
    }
}

/// Field equality used by `find_*_by_field`.
///
/// Numbers compare by value so `5` matches `5.0`, which is how a JSON
/// document store compares them.
pub fn field_matches(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => stored == wanted,
    }
}
