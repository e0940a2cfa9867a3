use std::marker::PhantomData;

use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::modules::persistence::entity::Entity;
use crate::modules::persistence::error::{DbError, DbResult};
use crate::modules::persistence::filter::{Filters, Sort};
use crate::modules::persistence::translation::{OWNER_ALIAS, TRANSLATION_ALIAS};
use crate::shared::language::Language;

/// `SELECT` over an entity's owner table, optionally joined to its
/// translation satellite for one language.
pub struct SelectQuery<E: Entity> {
    builder: QueryBuilder<'static, Postgres>,
    translated: bool,
    has_where: bool,
    has_order: bool,
    _entity: PhantomData<E>,
}

impl<E: Entity> SelectQuery<E> {
    /// Without a language, or for entities without a translation binding,
    /// only the owner row is selected.
    pub fn new(language: Option<Language>) -> Self {
        let mut builder = QueryBuilder::new(format!("SELECT {OWNER_ALIAS}.*"));
        let binding = E::TRANSLATION.zip(language);

        if let Some((binding, _)) = &binding {
            for column in binding.translated_fields() {
                builder.push(", ").push(column);
            }
        }
        builder.push(format!(" FROM {} {OWNER_ALIAS}", E::TABLE));
        if let Some((binding, language)) = &binding {
            binding.push_join(&mut builder, *language);
        }

        Self {
            builder,
            translated: binding.is_some(),
            has_where: false,
            has_order: false,
            _entity: PhantomData,
        }
    }

    /// Qualified column for `field`; translated fields resolve to the
    /// satellite only when it is joined.
    pub fn column(&self, field: &str) -> DbResult<String> {
        resolve::<E>(self.translated, field)
    }

    /// Start a new ANDed condition and hand back the builder to render it
    pub fn and_where(&mut self) -> &mut QueryBuilder<'static, Postgres> {
        self.builder
            .push(if self.has_where { " AND " } else { " WHERE " });
        self.has_where = true;
        &mut self.builder
    }

    pub fn filter(mut self, filters: &Filters) -> DbResult<Self> {
        if filters.is_empty() {
            return Ok(self);
        }
        // reject unknown fields before any SQL is rendered
        for predicate in filters.iter() {
            self.column(predicate.field())?;
        }
        let translated = self.translated;
        filters.push_sql(self.and_where(), |field| resolve::<E>(translated, field))?;
        Ok(self)
    }

    pub fn order_by(mut self, sorting: &[Sort]) -> DbResult<Self> {
        for sort in sorting {
            let column = self.column(&sort.field)?;
            self.builder
                .push(if self.has_order { ", " } else { " ORDER BY " })
                .push(column)
                .push(" ")
                .push(sort.direction.as_sql());
            self.has_order = true;
        }
        Ok(self)
    }

    #[cfg(test)]
    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub async fn fetch_all(mut self, conn: &mut PgConnection) -> DbResult<Vec<E>> {
        self.builder
            .build_query_as::<E>()
            .fetch_all(conn)
            .await
            .map_err(|e| DbError::from_sqlx(E::NAME, e))
    }

    pub async fn fetch_optional(mut self, conn: &mut PgConnection) -> DbResult<Option<E>> {
        self.builder
            .build_query_as::<E>()
            .fetch_optional(conn)
            .await
            .map_err(|e| DbError::from_sqlx(E::NAME, e))
    }
}

fn resolve<E: Entity>(translated: bool, field: &str) -> DbResult<String> {
    match E::TRANSLATION {
        Some(binding) if translated && binding.is_translated(field) => {
            Ok(format!("{TRANSLATION_ALIAS}.{field}"))
        }
        _ if E::has_column(field) => Ok(format!("{OWNER_ALIAS}.{field}")),
        _ => Err(DbError::Configuration(format!(
            "{} has no field {field}",
            E::NAME
        ))),
    }
}
