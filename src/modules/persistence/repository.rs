use std::marker::PhantomData;

use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::modules::persistence::entity::{Commit, Entity, Translated, Translation, ID_COLUMN};
use crate::modules::persistence::error::{DbError, DbResult};
use crate::modules::persistence::filter::{Filters, Sort};
use crate::modules::persistence::query::SelectQuery;
use crate::modules::persistence::value::Fields;
use crate::shared::language::Language;

/// Target table of a row write
struct WriteTarget<'a> {
    entity: &'static str,
    table: &'static str,
    columns: &'a [String],
    timestamped: bool,
}

/// Generic get/filter/save/create over any [`Entity`].
///
/// Every operation takes the caller's connection explicitly; pass a
/// transaction (`&mut *tx`) to group several operations atomically.
pub struct Repository<E>(PhantomData<E>);

impl<E: Entity> Repository<E> {
    /// Fetch one row by id.
    ///
    /// With a language the translation satellite is inner-joined, so a
    /// missing translation reads as `None` just like a missing id.
    pub async fn get(
        conn: &mut PgConnection,
        id: Uuid,
        language: Option<Language>,
    ) -> DbResult<Option<E>> {
        let mut query = SelectQuery::<E>::new(language);
        let column = query.column(ID_COLUMN)?;
        query.and_where().push(column).push(" = ").push_bind(id);
        query.fetch_optional(conn).await
    }

    /// Rows matching every predicate, ordered by `sorting`. No matches is an
    /// empty list, never an error.
    pub async fn filter(
        conn: &mut PgConnection,
        filters: &Filters,
        language: Option<Language>,
        sorting: &[Sort],
    ) -> DbResult<Vec<E>> {
        SelectQuery::<E>::new(language)
            .filter(filters)?
            .order_by(sorting)?
            .fetch_all(conn)
            .await
    }

    /// Every owner row, untranslated
    #[allow(dead_code)]
    pub async fn all(conn: &mut PgConnection) -> DbResult<Vec<E>> {
        SelectQuery::<E>::new(None).fetch_all(conn).await
    }

    /// Insert `instance`, or update it when its id already exists.
    ///
    /// Constraint violations come back as the typed [`DbError`] variants.
    pub async fn save(conn: &mut PgConnection, instance: &E, commit: Commit) -> DbResult<()> {
        let columns = owner_columns::<E>();
        let target = WriteTarget {
            entity: E::NAME,
            table: E::TABLE,
            columns: &columns,
            timestamped: E::TIMESTAMPED,
        };
        write_row(conn, &target, instance.id(), instance.fields()?, commit).await
    }
}

impl<E: Translated> Repository<E> {
    /// Create an owner row plus its translation for `language`, then read it
    /// back through the translated view.
    ///
    /// All rows are written in one transaction; nothing is left behind when
    /// any step fails.
    pub async fn create(conn: &mut PgConnection, fields: Fields, language: Language) -> DbResult<E> {
        let mut tx = conn.begin().await.map_err(|e| DbError::from_sqlx(E::NAME, e))?;

        let id = Self::stage_create(&mut tx, fields, language).await?;
        let instance = Self::get(&mut tx, id, Some(language))
            .await?
            .ok_or_else(|| DbError::Storage {
                entity: E::NAME,
                source: sqlx::Error::RowNotFound,
            })?;

        tx.commit().await.map_err(|e| DbError::from_sqlx(E::NAME, e))?;
        Ok(instance)
    }

    /// Write the rows of a create without committing; returns the new id.
    ///
    /// `fields` are split into owner columns and the binding's translated
    /// fields. Call inside a transaction the caller finalises.
    pub async fn stage_create(
        conn: &mut PgConnection,
        mut fields: Fields,
        language: Language,
    ) -> DbResult<Uuid> {
        let binding = E::TRANSLATION.ok_or_else(|| {
            DbError::Configuration(format!("{} has no translation binding", E::NAME))
        })?;
        let id = Uuid::new_v4();
        let translated = fields.split_off(binding.fields);

        let columns = owner_columns::<E>();
        let target = WriteTarget {
            entity: E::NAME,
            table: E::TABLE,
            columns: &columns,
            timestamped: E::TIMESTAMPED,
        };
        write_row(conn, &target, id, fields, Commit::Deferred).await?;
        Self::translate(conn, id, translated, language, Commit::Deferred).await?;

        tracing::debug!(entity = E::NAME, %id, %language, "Staged create");
        Ok(id)
    }

    /// Store `fields` as the `language` translation of owner `id`.
    ///
    /// A second translation in the same language is a
    /// [`DbError::UniqueConstraintViolation`] on the satellite.
    pub async fn translate(
        conn: &mut PgConnection,
        id: Uuid,
        fields: Fields,
        language: Language,
        commit: Commit,
    ) -> DbResult<()> {
        let row = <E::Translation as Translation>::for_owner(id, language, fields)?;
        Repository::<E::Translation>::save(conn, &row, commit).await
    }
}

fn owner_columns<E: Entity>() -> Vec<String> {
    E::COLUMNS.iter().map(|c| c.to_string()).collect()
}

async fn write_row(
    conn: &mut PgConnection,
    target: &WriteTarget<'_>,
    id: Uuid,
    fields: Fields,
    commit: Commit,
) -> DbResult<()> {
    let mut builder = upsert_statement(target, id, fields)?;

    match commit {
        Commit::Immediately => {
            let mut tx = conn
                .begin()
                .await
                .map_err(|e| DbError::from_sqlx(target.entity, e))?;
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::from_sqlx(target.entity, e))?;
            tx.commit()
                .await
                .map_err(|e| DbError::from_sqlx(target.entity, e))?;
        }
        Commit::Deferred => {
            builder
                .build()
                .execute(&mut *conn)
                .await
                .map_err(|e| DbError::from_sqlx(target.entity, e))?;
        }
    }
    Ok(())
}

/// `INSERT ... ON CONFLICT (id) DO UPDATE`, keeping `created_at` from the
/// first insert and refreshing `updated_at`.
fn upsert_statement(
    target: &WriteTarget<'_>,
    id: Uuid,
    fields: Fields,
) -> DbResult<QueryBuilder<'static, Postgres>> {
    if let Some(unknown) = fields
        .columns()
        .find(|column| !target.columns.iter().any(|c| c == column))
    {
        return Err(DbError::Configuration(format!(
            "{} has no field {unknown}",
            target.entity
        )));
    }

    let columns: Vec<String> = fields.columns().map(str::to_string).collect();
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} ({ID_COLUMN}", target.table));
    for column in &columns {
        builder.push(", ").push(column);
    }
    builder.push(") VALUES (").push_bind(id);
    for (_, value) in fields {
        builder.push(", ");
        value.push_bind(&mut builder);
    }
    builder.push(format!(") ON CONFLICT ({ID_COLUMN}) "));

    let mut assignments: Vec<String> = columns
        .iter()
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect();
    if target.timestamped {
        assignments.push("updated_at = now()".to_string());
    }

    if assignments.is_empty() {
        builder.push("DO NOTHING");
    } else {
        builder.push("DO UPDATE SET ").push(assignments.join(", "));
    }
    Ok(builder)
}
