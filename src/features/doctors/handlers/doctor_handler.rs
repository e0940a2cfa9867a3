use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{ActiveLanguage, AppJson, AppQuery};
use crate::features::doctors::dtos::{CreateDoctorDto, DoctorListQuery, DoctorResponseDto};
use crate::features::doctors::services::DoctorService;
use crate::shared::types::ItemsResponse;

/// List doctors
///
/// Filters combine with AND. `price_min`/`price_max` may be given in either
/// order; both zero means no price filter.
#[utoipa::path(
    get,
    path = "/api/doctors/",
    params(
        DoctorListQuery,
        ("x-language-code" = Option<String>, Header, description = "Active language code: en_GB (default) or zh_CN")
    ),
    responses(
        (status = 200, description = "List of doctors", body = ItemsResponse<DoctorResponseDto>),
        (status = 400, description = "Invalid query or language code")
    ),
    tag = "doctors"
)]
pub async fn list_doctors(
    State(service): State<Arc<DoctorService>>,
    ActiveLanguage(language): ActiveLanguage,
    AppQuery(query): AppQuery<DoctorListQuery>,
) -> Result<Json<ItemsResponse<DoctorResponseDto>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let doctors = service.list(query, language).await?;
    Ok(Json(ItemsResponse::new(doctors)))
}

/// Get doctor by id
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    params(
        ("id" = Uuid, Path, description = "The doctor id"),
        ("x-language-code" = Option<String>, Header, description = "Active language code: en_GB (default) or zh_CN")
    ),
    responses(
        (status = 200, description = "Doctor found", body = DoctorResponseDto),
        (status = 404, description = "Doctor not found in the active language")
    ),
    tag = "doctors"
)]
pub async fn get_doctor(
    State(service): State<Arc<DoctorService>>,
    ActiveLanguage(language): ActiveLanguage,
    Path(id): Path<Uuid>,
) -> Result<Json<DoctorResponseDto>> {
    let doctor = service.get(id, language).await?;
    Ok(Json(doctor))
}

/// Create a doctor
///
/// The name is stored for the active language only.
#[utoipa::path(
    post,
    path = "/api/doctors/",
    request_body = CreateDoctorDto,
    params(
        ("x-language-code" = Option<String>, Header, description = "Active language code: en_GB (default) or zh_CN")
    ),
    responses(
        (status = 201, description = "Doctor created", body = DoctorResponseDto),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Area or category not found"),
        (status = 409, description = "Conflicting doctor data")
    ),
    tag = "doctors"
)]
pub async fn create_doctor(
    State(service): State<Arc<DoctorService>>,
    ActiveLanguage(language): ActiveLanguage,
    AppJson(dto): AppJson<CreateDoctorDto>,
) -> Result<(StatusCode, Json<DoctorResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let doctor = service.create(dto, language).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}
