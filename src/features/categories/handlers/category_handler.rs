use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::ActiveLanguage;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::services::CategoryService;
use crate::shared::types::ItemsResponse;

/// List categories
#[utoipa::path(
    get,
    path = "/api/categories/",
    params(
        ("x-language-code" = Option<String>, Header, description = "Active language code: en_GB (default) or zh_CN")
    ),
    responses(
        (status = 200, description = "List of categories", body = ItemsResponse<CategoryResponseDto>),
        (status = 400, description = "Unsupported language code")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    ActiveLanguage(language): ActiveLanguage,
) -> Result<Json<ItemsResponse<CategoryResponseDto>>> {
    let categories = service.list(language).await?;
    Ok(Json(ItemsResponse::new(categories)))
}
