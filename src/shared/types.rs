use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// `{ "items": [...] }` envelope for list endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

impl<T> ItemsResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// Health check body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    /// The project name
    pub name: String,
}
