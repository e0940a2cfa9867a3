use std::collections::HashMap;

use sqlx::{Connection, PgConnection};
use uuid::Uuid;

use crate::features::doctors::models::{Doctor, DoctorCategory, DoctorUpdate, NewDoctor};
use crate::modules::persistence::filter::push_bind_list;
use crate::modules::persistence::translation::OWNER_ALIAS;
use crate::modules::persistence::{
    Commit, DbError, DbResult, Entity, Filters, Predicate, Repository, SelectQuery, Sort,
};
use crate::shared::language::Language;

/// Pseudo-filter field restricting doctors to any of the given categories
pub const CATEGORY_FILTER_FIELD: &str = "category_id";

/// Doctor persistence on top of the generic [`Repository`], adding the
/// doctor <-> category links.
pub struct DoctorRepository;

impl DoctorRepository {
    /// Create the doctor and its translation for `language` through the
    /// generic create, then one link per category, all in a single
    /// transaction.
    pub async fn create(
        conn: &mut PgConnection,
        doctor: NewDoctor,
        language: Language,
    ) -> DbResult<Doctor> {
        let (fields, category_ids) = doctor.into_parts()?;
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| DbError::from_sqlx(Doctor::NAME, e))?;

        let created = Repository::<Doctor>::create(&mut tx, fields, language).await?;
        for category_id in category_ids {
            let link = DoctorCategory::new(created.id, category_id);
            Repository::<DoctorCategory>::save(&mut tx, &link, Commit::Deferred).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::from_sqlx(Doctor::NAME, e))?;
        Ok(created)
    }

    /// Like [`Repository::filter`], with `category_id` matching doctors linked
    /// to at least one of the given categories. An empty category list does
    /// not restrict the result.
    pub async fn filter(
        conn: &mut PgConnection,
        filters: Filters,
        language: Option<Language>,
        sorting: &[Sort],
    ) -> DbResult<Vec<Doctor>> {
        select(filters, language, sorting)?.fetch_all(conn).await
    }

    /// Category ids linked to each of `doctor_ids`. Doctors without links are
    /// absent from the map.
    pub async fn category_ids(
        conn: &mut PgConnection,
        doctor_ids: &[Uuid],
    ) -> DbResult<HashMap<Uuid, Vec<Uuid>>> {
        if doctor_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let filters =
            Filters::new().with(Predicate::one_of("doctor_id", doctor_ids.iter().copied()));
        let links = Repository::<DoctorCategory>::filter(
            conn,
            &filters,
            None,
            &[Sort::asc("category_id")],
        )
        .await?;

        let mut by_doctor: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in links {
            by_doctor
                .entry(link.doctor_id)
                .or_default()
                .push(link.category_id);
        }
        Ok(by_doctor)
    }

    /// Apply `update` to an existing doctor and save it. `None` when the id
    /// does not exist.
    #[allow(dead_code)]
    pub async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        update: DoctorUpdate,
    ) -> DbResult<Option<Doctor>> {
        let Some(mut doctor) = Repository::<Doctor>::get(conn, id, None).await? else {
            return Ok(None);
        };

        update.apply(&mut doctor);
        Repository::<Doctor>::save(conn, &doctor, Commit::Immediately).await?;
        Repository::<Doctor>::get(conn, id, None).await
    }
}

fn select(
    mut filters: Filters,
    language: Option<Language>,
    sorting: &[Sort],
) -> DbResult<SelectQuery<Doctor>> {
    let categories = filters
        .take(CATEGORY_FILTER_FIELD)
        .map(Predicate::into_values)
        .transpose()?
        .unwrap_or_default();

    let mut query = SelectQuery::<Doctor>::new(language).filter(&filters)?;
    if !categories.is_empty() {
        let builder = query.and_where();
        builder.push(format!(
            "EXISTS (SELECT 1 FROM {} dc WHERE dc.doctor_id = {OWNER_ALIAS}.id AND dc.category_id IN (",
            DoctorCategory::TABLE
        ));
        push_bind_list(builder, &categories);
        builder.push("))");
    }

    query.order_by(sorting)
}
