//! Shared HTTP plumbing: response envelope, pagination, error mapping and
//! the enveloped JSON and query extractors.

pub mod api_query;
pub mod error;
pub mod validated_json;

pub use api_query::ApiQuery;
pub use error::{ApiError, ApiResult};
pub use validated_json::ValidatedJson;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::pagination::{Page, PageRequest};

/// Standard API response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "message"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// One page of a listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Current page (1-based)
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
    pub total_elements: u64,
}

impl<T, U: From<T>> From<Page<T>> for PaginatedResponse<U> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items.into_iter().map(U::from).collect(),
            page: page.page,
            size: page.size,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
        }
    }
}

/// `?page=&size=` query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number, starting at 1
    pub page: Option<u64>,
    /// Page size, capped by the server maximum
    pub size: Option<u64>,
}

/// Server-side page size policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u64,
    pub max_size: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
        }
    }
}

impl PageLimits {
    pub fn request(&self, params: &PageParams) -> PageRequest {
        PageRequest::clamped(params.page, params.size, self.default_size, self.max_size)
    }
}
