//! Resident domain entity

use crate::shared::errors::DomainError;

/// Resident of exactly one community, unique by (community, email)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resident {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub community_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResident {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub community_id: i64,
}

impl NewResident {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        community_id: i64,
    ) -> Result<Self, DomainError> {
        let first_name = first_name.into().trim().to_string();
        let last_name = last_name.into().trim().to_string();
        // Emails compare case-insensitively for the uniqueness rule.
        let email = email.into().trim().to_lowercase();

        if first_name.is_empty() || last_name.is_empty() {
            return Err(DomainError::Validation(
                "Resident name cannot be blank".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation(format!("Invalid email: {}", email)));
        }

        Ok(Self {
            first_name,
            last_name,
            email,
            community_id,
        })
    }
}

/// Optional name filters for listing a community's residents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidentCriteria {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ResidentCriteria {
    pub fn matches(&self, r: &Resident) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_deref()
                .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }
        contains(&r.first_name, &self.first_name) && contains(&r.last_name, &self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let r = NewResident::new("Ann", "Lee", " Ann.Lee@Example.com ", 1).unwrap();
        assert_eq!(r.email, "ann.lee@example.com");
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(NewResident::new("", "Lee", "a@b.c", 1).is_err());
        assert!(NewResident::new("Ann", "Lee", "not-an-email", 1).is_err());
    }

    #[test]
    fn criteria_match_substrings_case_insensitively() {
        let r = Resident {
            id: 1,
            first_name: "Annabel".into(),
            last_name: "Lee".into(),
            email: "a@b.c".into(),
            community_id: 1,
        };
        let criteria = ResidentCriteria {
            first_name: Some("ANNA".into()),
            last_name: None,
        };
        assert!(criteria.matches(&r));
        let criteria = ResidentCriteria {
            first_name: None,
            last_name: Some("smith".into()),
        };
        assert!(!criteria.matches(&r));
    }
}
