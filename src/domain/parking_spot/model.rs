//! Parking spot domain entity

use crate::shared::errors::DomainError;

/// Parking spot, unique by (community, code)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingSpot {
    pub id: i64,
    pub code: String,
    pub community_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParkingSpot {
    pub code: String,
    pub community_id: i64,
}

impl NewParkingSpot {
    pub fn new(code: impl Into<String>, community_id: i64) -> Result<Self, DomainError> {
        let code = code.into().trim().to_string();
        if code.is_empty() {
            return Err(DomainError::Validation(
                "Parking spot code cannot be blank".to_string(),
            ));
        }
        Ok(Self { code, community_id })
    }
}

impl ParkingSpot {
    pub fn code_matches(&self, filter: Option<&str>) -> bool {
        filter.map_or(true, |f| {
            self.code.to_lowercase().contains(&f.to_lowercase())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_trimmed_and_required() {
        assert_eq!(NewParkingSpot::new(" A-12 ", 1).unwrap().code, "A-12");
        assert!(NewParkingSpot::new("", 1).is_err());
    }

    #[test]
    fn code_filter_is_case_insensitive() {
        let spot = ParkingSpot {
            id: 1,
            code: "B-07".into(),
            community_id: 1,
        };
        assert!(spot.code_matches(Some("b-0")));
        assert!(spot.code_matches(None));
        assert!(!spot.code_matches(Some("A")));
    }
}
