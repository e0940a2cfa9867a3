use sqlx::{Postgres, QueryBuilder};

use crate::modules::persistence::entity::Translation;
use crate::shared::language::Language;

/// Alias of the owner table in generated statements
pub const OWNER_ALIAS: &str = "o";

/// Alias of the satellite translation table in generated statements
pub const TRANSLATION_ALIAS: &str = "t";

pub const LANGUAGE_CODE_COLUMN: &str = "language_code";

/// Connects an owner entity to its per-language satellite table.
///
/// The satellite holds one row per `(owner_id, language_code)` carrying the
/// translated `fields`; the link column is `<owner>_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationBinding {
    /// Entity name of the owner, e.g. `Doctor`
    pub owner: &'static str,
    pub table: &'static str,
    pub fields: &'static [&'static str],
}

impl TranslationBinding {
    /// Binding of `owner` to the table of satellite entity `S` translating `fields`
    pub const fn to<S: Translation>(owner: &'static str, fields: &'static [&'static str]) -> Self {
        Self {
            owner,
            table: S::TABLE,
            fields,
        }
    }

    /// Satellite columns to select alongside the owner row, in declaration order
    pub fn translated_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| format!("{TRANSLATION_ALIAS}.{field}"))
            .collect()
    }

    /// Satellite column pointing back at the owner
    pub fn owner_foreign_key(&self) -> String {
        format!("{}_id", self.owner.to_lowercase())
    }

    pub fn is_translated(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// ` JOIN <satellite> t ON t.<fk> = o.id AND t.language_code = $n`
    ///
    /// Inner join: owners without a row for `language` drop out of the result.
    pub fn push_join(&self, builder: &mut QueryBuilder<'static, Postgres>, language: Language) {
        builder
            .push(" JOIN ")
            .push(self.table)
            .push(format!(
                " {TRANSLATION_ALIAS} ON {TRANSLATION_ALIAS}.{} = {OWNER_ALIAS}.id AND {TRANSLATION_ALIAS}.{LANGUAGE_CODE_COLUMN} = ",
                self.owner_foreign_key()
            ))
            .push_bind(language.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINDING: TranslationBinding = TranslationBinding {
        owner: "Doctor",
        table: "doctors_translation",
        fields: &["name"],
    };

    #[test]
    fn test_owner_foreign_key_derived_from_owner_name() {
        assert_eq!(BINDING.owner_foreign_key(), "doctor_id");
    }

    #[test]
    fn test_translated_fields_are_qualified() {
        assert_eq!(BINDING.translated_fields(), vec!["t.name".to_string()]);
        assert!(BINDING.is_translated("name"));
        assert!(!BINDING.is_translated("price"));
    }

    #[test]
    fn test_join_filters_by_language() {
        let mut builder = QueryBuilder::new("SELECT o.* FROM doctors o");
        BINDING.push_join(&mut builder, Language::Chinese);
        assert_eq!(
            builder.sql(),
            "SELECT o.* FROM doctors o JOIN doctors_translation t ON t.doctor_id = o.id AND t.language_code = $1"
        );
    }
}
