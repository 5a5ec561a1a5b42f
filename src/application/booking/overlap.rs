//! Spot occupancy check

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{DomainResult, RepositoryProvider};

/// Detects RESERVED/ACTIVE bookings intersecting a half-open window.
///
/// Two windows overlap when `existing.start < end && existing.end > start`;
/// back-to-back windows do not.
#[derive(Clone)]
pub struct OverlapChecker {
    repos: Arc<dyn RepositoryProvider>,
}

impl OverlapChecker {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn exists(
        &self,
        spot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        self.repos
            .bookings()
            .exists_overlapping(spot_id, start, end)
            .await
    }
}
