use sqlx::FromRow;
use uuid::Uuid;

use crate::modules::persistence::{
    DbResult, Entity, Fields, Translated, Translation, TranslationBinding,
};
use crate::shared::language::Language;

/// Database model for category (a doctor's specialty)
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    #[sqlx(default)]
    pub name: Option<String>,
}

impl Entity for Category {
    const NAME: &'static str = "Category";
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &[];
    const TRANSLATION: Option<TranslationBinding> =
        Some(TranslationBinding::to::<CategoryTranslation>(Self::NAME, &["name"]));

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> DbResult<Fields> {
        Ok(Fields::new())
    }
}

impl Translated for Category {
    type Translation = CategoryTranslation;
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryTranslation {
    pub id: Uuid,
    pub category_id: Uuid,
    pub language_code: String,
    pub name: Option<String>,
}

impl Entity for CategoryTranslation {
    const NAME: &'static str = "CategoryTranslation";
    const TABLE: &'static str = "categories_translation";
    const COLUMNS: &'static [&'static str] = &["category_id", "language_code", "name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> DbResult<Fields> {
        Ok(Fields::new()
            .set("category_id", self.category_id)
            .set("language_code", self.language_code.clone())
            .set("name", self.name.clone()))
    }
}

impl Translation for CategoryTranslation {
    fn for_owner(category_id: Uuid, language: Language, mut fields: Fields) -> DbResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            category_id,
            language_code: language.as_str().to_string(),
            name: fields.take_text("name")?,
        })
    }
}
