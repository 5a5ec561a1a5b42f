//! Community domain entity

use crate::shared::errors::DomainError;

/// Group of residents and parking spots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommunity {
    pub name: String,
}

impl NewCommunity {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "Community name cannot be blank".to_string(),
            ));
        }
        Ok(Self { name })
    }
}
