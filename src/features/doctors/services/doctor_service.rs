use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::areas::models::Area;
use crate::features::categories::models::Category;
use crate::features::doctors::dtos::{CreateDoctorDto, DoctorListQuery, DoctorResponseDto};
use crate::features::doctors::models::{Doctor, NewDoctor};
use crate::features::doctors::repositories::{DoctorRepository, CATEGORY_FILTER_FIELD};
use crate::modules::persistence::{Entity, Filters, Operand, Repository, Sort};
use crate::shared::language::Language;

/// Service for doctor operations.
///
/// Each call holds one pooled connection for its whole duration.
pub struct DoctorService {
    pool: PgPool,
}

impl DoctorService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List doctors named in `language` matching the query
    pub async fn list(
        &self,
        query: DoctorListQuery,
        language: Language,
    ) -> Result<Vec<DoctorResponseDto>> {
        let filters = list_filters(&query)?;
        let sorting = Sort::compile([("created_at", "asc"), ("id", "asc")])?;
        let mut conn = self.pool.acquire().await?;

        let doctors = DoctorRepository::filter(&mut conn, filters, Some(language), &sorting)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list doctors: {:?}", e);
                AppError::from(e)
            })?;

        let ids: Vec<Uuid> = doctors.iter().map(|d| d.id).collect();
        let mut category_ids = DoctorRepository::category_ids(&mut conn, &ids)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load doctor categories: {:?}", e);
                AppError::from(e)
            })?;

        Ok(doctors
            .into_iter()
            .map(|doctor| {
                let categories = category_ids.remove(&doctor.id).unwrap_or_default();
                DoctorResponseDto::new(doctor, categories)
            })
            .collect())
    }

    /// Get a doctor in `language`; a doctor without a translation for it is
    /// not found
    pub async fn get(&self, id: Uuid, language: Language) -> Result<DoctorResponseDto> {
        let mut conn = self.pool.acquire().await?;

        let doctor = Repository::<Doctor>::get(&mut conn, id, Some(language))
            .await
            .map_err(|e| {
                tracing::error!("Failed to get doctor {}: {:?}", id, e);
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found(Doctor::NAME, id))?;

        self.respond(&mut conn, doctor).await
    }

    /// Create a doctor after checking that its area and categories exist
    pub async fn create(
        &self,
        dto: CreateDoctorDto,
        language: Language,
    ) -> Result<DoctorResponseDto> {
        let mut conn = self.pool.acquire().await?;

        ensure_exists::<Area>(&mut conn, dto.area_id).await?;
        for category_id in &dto.category_ids {
            ensure_exists::<Category>(&mut conn, *category_id).await?;
        }

        let doctor = DoctorRepository::create(&mut conn, NewDoctor::from(dto), language)
            .await
            .map_err(|e| {
                if e.is_validation() {
                    tracing::warn!("Rejected doctor create: {}", e);
                } else {
                    tracing::error!("Failed to create doctor: {:?}", e);
                }
                AppError::from(e)
            })?;

        tracing::info!(doctor_id = %doctor.id, %language, "Doctor created");
        self.respond(&mut conn, doctor).await
    }

    async fn respond(&self, conn: &mut PgConnection, doctor: Doctor) -> Result<DoctorResponseDto> {
        let categories = DoctorRepository::category_ids(conn, &[doctor.id])
            .await
            .map_err(|e| {
                tracing::error!("Failed to load doctor categories: {:?}", e);
                AppError::from(e)
            })?
            .remove(&doctor.id)
            .unwrap_or_default();

        Ok(DoctorResponseDto::new(doctor, categories))
    }
}

/// `area_id` exact, `category_id__in` and a normalized `price__between`
fn list_filters(query: &DoctorListQuery) -> Result<Filters> {
    let category_filter = format!("{}__in", CATEGORY_FILTER_FIELD);
    let mut entries: Vec<(&str, Operand)> = Vec::new();

    if let Some(area_id) = query.area_id {
        entries.push(("area_id", Operand::value(area_id)));
    }
    if !query.category_ids.is_empty() {
        entries.push((
            category_filter.as_str(),
            Operand::list(query.category_ids.iter().copied()),
        ));
    }
    if let Some((min, max)) = query.price_range() {
        entries.push(("price__between", Operand::range(min, max)));
    }

    Ok(Filters::compile(entries)?)
}

/// 404 `"{Model} is not found {id}"` unless the row exists in any language
async fn ensure_exists<E: Entity>(conn: &mut PgConnection, id: Uuid) -> Result<()> {
    Repository::<E>::get(conn, id, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up {} {}: {:?}", E::NAME, id, e);
            AppError::from(e)
        })?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found(E::NAME, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::persistence::Predicate;
    use rust_decimal::Decimal;

    #[test]
    fn test_list_filters_empty_query_matches_all() {
        let filters = list_filters(&DoctorListQuery::default()).unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_list_filters_one_predicate_per_param() {
        let area_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let query = DoctorListQuery {
            area_id: Some(area_id),
            category_ids: vec![category_id],
            price_min: Decimal::from(2500),
            price_max: Decimal::ZERO,
        };

        let filters: Vec<Predicate> = list_filters(&query).unwrap().iter().cloned().collect();

        assert_eq!(
            filters,
            vec![
                Predicate::exact("area_id", area_id),
                Predicate::one_of("category_id", [category_id]),
                Predicate::between("price", Decimal::ZERO, Decimal::from(2500)),
            ]
        );
    }
}
