use utoipa::{Modify, OpenApi};

use crate::features::areas::{dtos as areas_dtos, handlers as areas_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::doctors::{
    dtos as doctors_dtos, handlers as doctors_handlers, models as doctors_models,
};
use crate::shared::language::Language;
use crate::shared::types::{ErrorResponse, ItemsResponse, RootResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Doctors
        doctors_handlers::list_doctors,
        doctors_handlers::get_doctor,
        doctors_handlers::create_doctor,
        // Areas
        areas_handlers::list_areas,
        // Categories
        categories_handlers::list_categories,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            RootResponse,
            Language,
            // Doctors
            doctors_dtos::CreateDoctorDto,
            doctors_dtos::DoctorResponseDto,
            doctors_models::WorkingHours,
            doctors_models::TimeWorking,
            ItemsResponse<doctors_dtos::DoctorResponseDto>,
            // Areas
            areas_dtos::AreaResponseDto,
            ItemsResponse<areas_dtos::AreaResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            ItemsResponse<categories_dtos::CategoryResponseDto>,
        )
    ),
    tags(
        (name = "doctors", description = "Doctors with localized names"),
        (name = "areas", description = "Areas doctors practise in"),
        (name = "categories", description = "Doctor categories"),
    ),
    info(
        title = "Necktie API",
        version = "0.1.0",
        description = "Doctors directory with localized names",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
