//! Review types

use crate::{DealershipId, EntityKind, Record};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Year of the first production automobile; anything older is a typo.
pub const MIN_CAR_YEAR: i32 = 1886;

/// A stored review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub dealership: DealershipId,
    pub review: String,
    #[serde(default)]
    pub purchase: bool,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default)]
    pub car_make: String,
    #[serde(default)]
    pub car_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_year: Option<i32>,
}

impl Review {
    /// Attach a store-assigned id to a candidate.
    pub fn from_candidate(id: i64, candidate: ReviewCandidate) -> Self {
        Self {
            id,
            name: candidate.name,
            dealership: candidate.dealership,
            review: candidate.review,
            purchase: candidate.purchase,
            purchase_date: candidate.purchase_date,
            car_make: candidate.car_make,
            car_model: candidate.car_model,
            car_year: candidate.car_year,
        }
    }
}

impl Record for Review {
    const KIND: EntityKind = EntityKind::Review;

    fn id(&self) -> i64 {
        self.id
    }
}

/// A review submitted for insertion; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCandidate {
    pub name: String,
    pub dealership: DealershipId,
    pub review: String,
    #[serde(default)]
    pub purchase: bool,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default)]
    pub car_make: String,
    #[serde(default)]
    pub car_model: String,
    #[serde(default)]
    pub car_year: Option<i32>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field must not be blank: {0}")]
    Blank(&'static str),

    #[error("Dealership id must be positive, got {0}")]
    NonPositiveDealership(DealershipId),

    #[error("Car year {year} outside {min}..={max}")]
    CarYearOutOfRange { year: i32, min: i32, max: i32 },
}

impl ReviewCandidate {
    /// Check the fields a caller must supply before handing the candidate to
    /// a store. Stores never call this themselves.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Blank("name"));
        }
        if self.review.trim().is_empty() {
            return Err(ValidationError::Blank("review"));
        }
        if self.dealership.get() <= 0 {
            return Err(ValidationError::NonPositiveDealership(self.dealership));
        }
        if let Some(year) = self.car_year {
            // Next year's models go on sale during the current year.
            let max = chrono::Utc::now().year() + 1;
            if !(MIN_CAR_YEAR..=max).contains(&year) {
                return Err(ValidationError::CarYearOutOfRange {
                    year,
                    min: MIN_CAR_YEAR,
                    max,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate() -> ReviewCandidate {
        serde_json::from_value(json!({
            "name": "Berkly Shepley",
            "dealership": "15",
            "review": "Total grid-enabled service-desk",
            "purchase": true,
            "purchase_date": "07/11/2020",
            "car_make": "Audi",
            "car_model": "A6",
            "car_year": 2010
        }))
        .unwrap()
    }

    #[test]
    fn test_candidate_normalizes_string_dealership() {
        let candidate = candidate();
        assert_eq!(candidate.dealership, DealershipId::new(15));
        assert!(candidate.validate().is_ok());

        let review = Review::from_candidate(51, candidate);
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["id"], json!(51));
        assert_eq!(value["dealership"], json!(15));
    }

    #[test]
    fn test_candidate_optional_purchase_fields_default() {
        let candidate: ReviewCandidate = serde_json::from_value(json!({
            "name": "Gwenora Zettoi",
            "dealership": 23,
            "review": "Future-proofed foreground capability"
        }))
        .unwrap();

        assert!(!candidate.purchase);
        assert_eq!(candidate.car_make, "");
        assert_eq!(candidate.car_year, None);
        assert!(candidate.validate().is_ok());
    }

    #[test]
    fn test_stored_review_accepts_candidate_shape() {
        let review: Review = serde_json::from_value(json!({
            "id": 9,
            "name": "Gwenora Zettoi",
            "dealership": 23,
            "review": "Future-proofed foreground capability"
        }))
        .unwrap();

        assert!(!review.purchase);
        assert_eq!(review.purchase_date, "");
        assert_eq!(review.car_year, None);
    }

    #[test]
    fn test_candidate_rejects_wrong_types() {
        let result = serde_json::from_value::<ReviewCandidate>(json!({
            "name": "x",
            "dealership": 1,
            "review": "y",
            "purchase": "yes"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_policy() {
        let mut blank_name = candidate();
        blank_name.name = "   ".to_string();
        assert_eq!(blank_name.validate(), Err(ValidationError::Blank("name")));

        let mut blank_review = candidate();
        blank_review.review = String::new();
        assert_eq!(blank_review.validate(), Err(ValidationError::Blank("review")));

        let mut bad_dealer = candidate();
        bad_dealer.dealership = DealershipId::new(0);
        assert!(matches!(
            bad_dealer.validate(),
            Err(ValidationError::NonPositiveDealership(_))
        ));

        let mut ancient = candidate();
        ancient.car_year = Some(1700);
        assert!(matches!(
            ancient.validate(),
            Err(ValidationError::CarYearOutOfRange { year: 1700, .. })
        ));
    }

    #[test]
    fn test_review_field_lookup() {
        let review = Review::from_candidate(3, candidate());
        assert_eq!(review.field("dealership"), Some(json!(15)));
        assert_eq!(review.field("car_make"), Some(json!("Audi")));
        assert_eq!(review.field("nope"), None);
    }
}
