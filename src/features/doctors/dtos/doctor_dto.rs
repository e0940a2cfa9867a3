use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::doctors::models::{Doctor, NewDoctor, WorkingHours};
use crate::shared::validation::{validate_price, PHONE_NUMBER_REGEX};

/// Request DTO for creating a doctor in the active language
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDoctorDto {
    /// Area the doctor practises in
    pub area_id: Uuid,

    /// Categories the doctor belongs to
    #[serde(default)]
    pub category_ids: Vec<Uuid>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 100)]
    pub price: Decimal,

    #[validate(
        length(max = 13, message = "Phone number must not exceed 13 characters"),
        regex(path = *PHONE_NUMBER_REGEX, message = "Phone number may only contain digits, spaces, hyphens and a leading '+'")
    )]
    #[schema(example = "23456789")]
    pub phone_number: Option<String>,

    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    #[schema(example = "Dr. Chan Tai Man")]
    pub name: String,

    /// Defaults to weekday office hours when omitted
    pub working_hours: Option<WorkingHours>,
}

impl From<CreateDoctorDto> for NewDoctor {
    fn from(dto: CreateDoctorDto) -> Self {
        let mut category_ids = Vec::with_capacity(dto.category_ids.len());
        for id in dto.category_ids {
            if !category_ids.contains(&id) {
                category_ids.push(id);
            }
        }

        Self {
            area_id: dto.area_id,
            category_ids,
            price: dto.price,
            phone_number: dto.phone_number,
            name: dto.name,
            working_hours: dto.working_hours.unwrap_or_default(),
        }
    }
}

/// Response DTO for doctor, translated into the active language
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorResponseDto {
    pub id: Uuid,
    pub area_id: Uuid,
    /// Ids of the linked categories
    pub category_ids: Vec<Uuid>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100)]
    pub price: Decimal,
    pub phone_number: Option<String>,
    pub name: String,
    pub working_hours: WorkingHours,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DoctorResponseDto {
    pub fn new(doctor: Doctor, category_ids: Vec<Uuid>) -> Self {
        Self {
            id: doctor.id,
            area_id: doctor.area_id,
            category_ids,
            price: doctor.price,
            phone_number: doctor.phone_number,
            name: doctor.name.unwrap_or_default(),
            working_hours: doctor.working_hours.0,
            created_at: doctor.created_at,
            updated_at: doctor.updated_at,
        }
    }
}

/// Query params for listing doctors.
///
/// `category_ids` may be repeated (`?category_ids=a&category_ids=b`) or
/// comma-separated. Price bounds of zero mean "unbounded" unless the other
/// bound is set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DoctorListQuery {
    /// The area id
    pub area_id: Option<Uuid>,
    /// Doctors in any of these categories
    #[serde(default, alias = "category_ids[]", deserialize_with = "comma_separated_uuids")]
    pub category_ids: Vec<Uuid>,
    /// The min of the price range
    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    #[param(value_type = Option<f64>, example = 0)]
    pub price_min: Decimal,
    /// The max of the price range
    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    #[param(value_type = Option<f64>, example = 1000)]
    pub price_max: Decimal,
}

impl DoctorListQuery {
    /// `(min, max)` in ascending order, `None` when both bounds are zero
    pub fn price_range(&self) -> Option<(Decimal, Decimal)> {
        if self.price_min.is_zero() && self.price_max.is_zero() {
            return None;
        }
        Some((
            self.price_min.min(self.price_max),
            self.price_min.max(self.price_max),
        ))
    }
}

fn comma_separated_uuids<'de, D>(deserializer: D) -> Result<Vec<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<String>::deserialize(deserializer)?;
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| Uuid::parse_str(id).map_err(de::Error::custom))
        .collect()
}
