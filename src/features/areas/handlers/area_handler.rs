use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::ActiveLanguage;
use crate::features::areas::dtos::AreaResponseDto;
use crate::features::areas::services::AreaService;
use crate::shared::types::ItemsResponse;

/// List areas
///
/// Only areas translated into the requested language are returned.
#[utoipa::path(
    get,
    path = "/api/areas/",
    params(
        ("x-language-code" = Option<String>, Header, description = "Active language code: en_GB (default) or zh_CN")
    ),
    responses(
        (status = 200, description = "List of areas", body = ItemsResponse<AreaResponseDto>),
        (status = 400, description = "Unsupported language code")
    ),
    tag = "areas"
)]
pub async fn list_areas(
    State(service): State<Arc<AreaService>>,
    ActiveLanguage(language): ActiveLanguage,
) -> Result<Json<ItemsResponse<AreaResponseDto>>> {
    let areas = service.list(language).await?;
    Ok(Json(ItemsResponse::new(areas)))
}
