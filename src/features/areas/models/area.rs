use sqlx::FromRow;
use uuid::Uuid;

use crate::modules::persistence::{
    DbResult, Entity, Fields, Translated, Translation, TranslationBinding,
};
use crate::shared::language::Language;

/// Database model for area.
///
/// An area stands for a full address (clinic, room, building). Its name lives
/// in `areas_translation`.
#[derive(Debug, Clone, FromRow)]
pub struct Area {
    pub id: Uuid,
    #[sqlx(default)]
    pub name: Option<String>,
}

impl Entity for Area {
    const NAME: &'static str = "Area";
    const TABLE: &'static str = "areas";
    const COLUMNS: &'static [&'static str] = &[];
    const TRANSLATION: Option<TranslationBinding> =
        Some(TranslationBinding::to::<AreaTranslation>(Self::NAME, &["name"]));

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> DbResult<Fields> {
        Ok(Fields::new())
    }
}

impl Translated for Area {
    type Translation = AreaTranslation;
}

/// Per-language name of an area, unique per (area_id, language_code)
#[derive(Debug, Clone, FromRow)]
pub struct AreaTranslation {
    pub id: Uuid,
    pub area_id: Uuid,
    pub language_code: String,
    pub name: Option<String>,
}

impl Entity for AreaTranslation {
    const NAME: &'static str = "AreaTranslation";
    const TABLE: &'static str = "areas_translation";
    const COLUMNS: &'static [&'static str] = &["area_id", "language_code", "name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> DbResult<Fields> {
        Ok(Fields::new()
            .set("area_id", self.area_id)
            .set("language_code", self.language_code.clone())
            .set("name", self.name.clone()))
    }
}

impl Translation for AreaTranslation {
    fn for_owner(area_id: Uuid, language: Language, mut fields: Fields) -> DbResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            area_id,
            language_code: language.as_str().to_string(),
            name: fields.take_text("name")?,
        })
    }
}
