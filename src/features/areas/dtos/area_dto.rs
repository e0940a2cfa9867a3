use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::areas::models::Area;

/// Response DTO for area, in the active language
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AreaResponseDto {
    pub id: Uuid,
    /// Area name
    #[schema(example = "Mariana Medical Central, Room 2005")]
    pub name: String,
}

impl From<Area> for AreaResponseDto {
    fn from(a: Area) -> Self {
        Self {
            id: a.id,
            name: a.name.unwrap_or_default(),
        }
    }
}
