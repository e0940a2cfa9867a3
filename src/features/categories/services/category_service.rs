use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::Category;
use crate::modules::persistence::{Filters, Repository, Sort};
use crate::shared::language::Language;

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List categories named in `language`, ordered by name
    pub async fn list(&self, language: Language) -> Result<Vec<CategoryResponseDto>> {
        let mut conn = self.pool.acquire().await?;

        let categories = Repository::<Category>::filter(
            &mut conn,
            &Filters::new(),
            Some(language),
            &[Sort::asc("name")],
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::from(e)
        })?;

        Ok(categories.into_iter().map(Into::into).collect())
    }
}
