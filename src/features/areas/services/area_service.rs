use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::areas::dtos::AreaResponseDto;
use crate::features::areas::models::Area;
use crate::modules::persistence::{Filters, Repository, Sort};
use crate::shared::language::Language;

/// Service for area operations
pub struct AreaService {
    pool: PgPool,
}

impl AreaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List areas that have a name in `language`, ordered by name
    pub async fn list(&self, language: Language) -> Result<Vec<AreaResponseDto>> {
        let mut conn = self.pool.acquire().await?;

        let areas = Repository::<Area>::filter(
            &mut conn,
            &Filters::new(),
            Some(language),
            &[Sort::asc("name")],
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list areas: {:?}", e);
            AppError::from(e)
        })?;

        Ok(areas.into_iter().map(Into::into).collect())
    }
}
