//! Canonical dealership reference
//!
//! Callers hand dealership ids around as JSON numbers, path segments and form
//! strings. Everything is parsed into [`DealershipId`] once, on ingress, and
//! compared numerically from then on.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid dealership id: {0:?}")]
pub struct InvalidDealershipId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DealershipId(i64);

impl DealershipId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Accepts an integral float such as `5.0`.
    pub fn from_f64(value: f64) -> Result<Self, InvalidDealershipId> {
        if value.is_finite()
            && value.fract() == 0.0
            && value >= i64::MIN as f64
            && value < i64::MAX as f64
        {
            Ok(Self(value as i64))
        } else {
            Err(InvalidDealershipId(value.to_string()))
        }
    }
}

impl From<i64> for DealershipId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<DealershipId> for i64 {
    fn from(id: DealershipId) -> Self {
        id.0
    }
}

impl std::fmt::Display for DealershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DealershipId {
    type Err = InvalidDealershipId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<i64>() {
            return Ok(Self(id));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(|f| Self::from_f64(f).ok())
            .ok_or_else(|| InvalidDealershipId(s.to_string()))
    }
}

impl TryFrom<&Value> for DealershipId {
    type Error = InvalidDealershipId;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => {
                if let Some(id) = n.as_i64() {
                    Ok(Self(id))
                } else if let Some(f) = n.as_f64() {
                    Self::from_f64(f)
                } else {
                    Err(InvalidDealershipId(n.to_string()))
                }
            }
            Value::String(s) => s.parse(),
            other => Err(InvalidDealershipId(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for DealershipId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DealershipIdVisitor)
    }
}

struct DealershipIdVisitor;

impl<'de> Visitor<'de> for DealershipIdVisitor {
    type Value = DealershipId;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a dealership id as an integer or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DealershipId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(DealershipId)
            .map_err(|_| E::custom(InvalidDealershipId(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        DealershipId::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}
