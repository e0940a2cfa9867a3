use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::modules::persistence::error::{DbError, DbResult};
use crate::shared::language::Language;

/// A value bound into a generated statement.
///
/// Nullable variants keep their SQL type so that binding `NULL` into a typed
/// column does not depend on server-side inference.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Uuid(Uuid),
    Decimal(Option<Decimal>),
    Text(Option<String>),
    Json(Option<serde_json::Value>),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    pub fn push_bind(self, builder: &mut QueryBuilder<'static, Postgres>) {
        match self {
            SqlValue::Uuid(v) => builder.push_bind(v),
            SqlValue::Decimal(v) => builder.push_bind(v),
            SqlValue::Text(v) => builder.push_bind(v),
            SqlValue::Json(v) => builder.push_bind(v),
            SqlValue::Timestamp(v) => builder.push_bind(v),
        };
    }

    /// Ordering between two values of the same kind, `None` otherwise.
    pub fn compare(&self, other: &SqlValue) -> Option<Ordering> {
        match (self, other) {
            (SqlValue::Uuid(a), SqlValue::Uuid(b)) => Some(a.cmp(b)),
            (SqlValue::Decimal(Some(a)), SqlValue::Decimal(Some(b))) => Some(a.cmp(b)),
            (SqlValue::Text(Some(a)), SqlValue::Text(Some(b))) => Some(a.cmp(b)),
            (SqlValue::Timestamp(a), SqlValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(Some(v))
    }
}

impl From<Option<Decimal>> for SqlValue {
    fn from(v: Option<Decimal>) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(Some(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(Some(v.to_string()))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::Text(v)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        SqlValue::Json(Some(v))
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl From<Language> for SqlValue {
    fn from(v: Language) -> Self {
        SqlValue::Text(Some(v.as_str().to_string()))
    }
}

/// Ordered column -> value list used to write a row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, SqlValue)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any earlier value for it
    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        let column = column.into();
        let value = value.into();
        match self.0.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.0.push((column, value)),
        }
    }

    /// Move every listed column out of `self` into a new set
    pub fn split_off(&mut self, columns: &[&str]) -> Fields {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.0)
            .into_iter()
            .partition(|(name, _)| columns.contains(&name.as_str()));
        self.0 = kept;
        Fields(taken)
    }

    /// Remove `column` and return its text; an absent column reads as `None`
    pub fn take_text(&mut self, column: &str) -> DbResult<Option<String>> {
        let Some(position) = self.0.iter().position(|(name, _)| name == column) else {
            return Ok(None);
        };
        match self.0.remove(position).1 {
            SqlValue::Text(text) => Ok(text),
            other => Err(DbError::Configuration(format!(
                "{column} expects text, got {other:?}"
            ))),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for Fields {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_column() {
        let fields = Fields::new()
            .set("name", "Dr. X")
            .set("price", Decimal::from(100))
            .set("name", "Dr. Y");

        assert_eq!(fields.columns().collect::<Vec<_>>(), vec!["name", "price"]);
        let (_, name) = fields.into_iter().next().unwrap();
        assert_eq!(name, SqlValue::from("Dr. Y"));
    }

    #[test]
    fn test_split_off_moves_listed_columns() {
        let mut fields = Fields::new()
            .set("area_id", Uuid::nil())
            .set("name", "Dr. X")
            .set("price", Decimal::from(100));

        let translated = fields.split_off(&["name"]);

        assert_eq!(translated.columns().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(fields.columns().collect::<Vec<_>>(), vec!["area_id", "price"]);
    }

    #[test]
    fn test_take_text_removes_column() {
        let mut fields = Fields::new().set("name", "Dr. X").set("price", Decimal::from(1));

        assert_eq!(fields.take_text("name").unwrap(), Some("Dr. X".to_string()));
        assert_eq!(fields.columns().collect::<Vec<_>>(), vec!["price"]);
        assert_eq!(fields.take_text("name").unwrap(), None);
        assert!(matches!(
            fields.take_text("price"),
            Err(DbError::Configuration(msg)) if msg.starts_with("price expects text")
        ));
    }

    #[test]
    fn test_compare_only_within_same_kind() {
        let low = SqlValue::from(Decimal::from(50));
        let high = SqlValue::from(Decimal::from(200));
        assert_eq!(low.compare(&high), Some(Ordering::Less));
        assert_eq!(low.compare(&SqlValue::from("50")), None);
        assert_eq!(SqlValue::Decimal(None).compare(&high), None);
    }
}
