use sqlx::{postgres::PgRow, FromRow};
use uuid::Uuid;

use crate::modules::persistence::error::DbResult;
use crate::modules::persistence::translation::TranslationBinding;
use crate::modules::persistence::value::Fields;
use crate::shared::language::Language;

pub const ID_COLUMN: &str = "id";
pub const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Table metadata and row mapping shared by every persisted entity.
///
/// Translatable entities declare a [`TranslationBinding`]; their translated
/// fields are `#[sqlx(default)]` so rows read without a language still map.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static {
    /// Name used in error messages, e.g. `Doctor`
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Writable owner columns, excluding `id` and timestamps
    const COLUMNS: &'static [&'static str];
    const TIMESTAMPED: bool = true;
    const TRANSLATION: Option<TranslationBinding> = None;

    fn id(&self) -> Uuid;

    /// Current values of [`Entity::COLUMNS`]
    fn fields(&self) -> DbResult<Fields>;

    /// Whether `field` is a column of the owner table
    fn has_column(field: &str) -> bool {
        field == ID_COLUMN
            || Self::COLUMNS.contains(&field)
            || (Self::TIMESTAMPED && TIMESTAMP_COLUMNS.contains(&field))
    }
}

/// Owner entity whose translated fields are stored in `Self::Translation`
pub trait Translated: Entity {
    type Translation: Translation;
}

/// Satellite row holding one language of an owner's translated fields
pub trait Translation: Entity {
    /// Row for `owner_id` in `language` carrying the translated `fields`
    fn for_owner(owner_id: Uuid, language: Language, fields: Fields) -> DbResult<Self>;
}

/// Whether [`save`](crate::modules::persistence::Repository::save) finalises its write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commit {
    /// Run in a transaction of its own (a savepoint when one is already open)
    #[default]
    Immediately,
    /// Write into the caller's open transaction; the caller commits
    Deferred,
}
