//! Dealership types

use crate::{EntityKind, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dealership as loaded from seed data.
///
/// Only `id`, `state` and `full_name` are interpreted. Every other field
/// (`city`, `address`, `zip`, `lat`, `long`, `short_name`, ...) is kept in
/// `details` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dealership {
    pub id: i64,
    pub state: String,
    pub full_name: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Dealership {
    pub fn new(id: i64, state: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id,
            state: state.into(),
            full_name: full_name.into(),
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl Record for Dealership {
    const KIND: EntityKind = EntityKind::Dealership;

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "state" => Some(Value::from(self.state.clone())),
            "full_name" => Some(Value::from(self.full_name.clone())),
            other => self.details.get(other).cloned(),
        }
    }
}
