use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::features::doctors::models::WorkingHours;
use crate::modules::persistence::{
    DbError, DbResult, Entity, Fields, SqlValue, Translated, Translation, TranslationBinding,
};
use crate::shared::language::Language;

/// Database model for doctor.
///
/// `name` comes from `doctors_translation` and is only populated when the row
/// was read for a language.
#[derive(Debug, Clone, FromRow)]
pub struct Doctor {
    pub id: Uuid,
    pub area_id: Uuid,
    pub price: Decimal,
    pub phone_number: Option<String>,
    pub working_hours: Json<WorkingHours>,
    #[sqlx(default)]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Doctor {
    const NAME: &'static str = "Doctor";
    const TABLE: &'static str = "doctors";
    const COLUMNS: &'static [&'static str] = &["area_id", "price", "phone_number", "working_hours"];
    const TRANSLATION: Option<TranslationBinding> =
        Some(TranslationBinding::to::<DoctorTranslation>(Self::NAME, &["name"]));

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> DbResult<Fields> {
        Ok(Fields::new()
            .set("area_id", self.area_id)
            .set("price", self.price)
            .set("phone_number", self.phone_number.clone())
            .set("working_hours", working_hours_value(&self.working_hours)?))
    }
}

impl Translated for Doctor {
    type Translation = DoctorTranslation;
}

fn working_hours_value(working_hours: &WorkingHours) -> DbResult<SqlValue> {
    serde_json::to_value(working_hours)
        .map(SqlValue::from)
        .map_err(|e| DbError::Storage {
            entity: Doctor::NAME,
            source: sqlx::Error::Encode(Box::new(e)),
        })
}

/// Per-language doctor name
#[derive(Debug, Clone, FromRow)]
pub struct DoctorTranslation {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub language_code: String,
    pub name: Option<String>,
}

impl Entity for DoctorTranslation {
    const NAME: &'static str = "DoctorTranslation";
    const TABLE: &'static str = "doctors_translation";
    const COLUMNS: &'static [&'static str] = &["doctor_id", "language_code", "name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> DbResult<Fields> {
        Ok(Fields::new()
            .set("doctor_id", self.doctor_id)
            .set("language_code", self.language_code.clone())
            .set("name", self.name.clone()))
    }
}

impl Translation for DoctorTranslation {
    fn for_owner(doctor_id: Uuid, language: Language, mut fields: Fields) -> DbResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            doctor_id,
            language_code: language.as_str().to_string(),
            name: fields.take_text("name")?,
        })
    }
}

/// Link between a doctor and one of its categories
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DoctorCategory {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub category_id: Uuid,
}

impl DoctorCategory {
    pub fn new(doctor_id: Uuid, category_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            category_id,
        }
    }
}

impl Entity for DoctorCategory {
    const NAME: &'static str = "DoctorCategory";
    const TABLE: &'static str = "doctors_categories";
    const COLUMNS: &'static [&'static str] = &["doctor_id", "category_id"];
    const TIMESTAMPED: bool = false;

    fn id(&self) -> Uuid {
        self.id
    }

    fn fields(&self) -> DbResult<Fields> {
        Ok(Fields::new()
            .set("doctor_id", self.doctor_id)
            .set("category_id", self.category_id))
    }
}

/// Everything needed to create a doctor in one language
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub area_id: Uuid,
    pub category_ids: Vec<Uuid>,
    pub price: Decimal,
    pub phone_number: Option<String>,
    pub name: String,
    pub working_hours: WorkingHours,
}

impl NewDoctor {
    /// Column values (the translated `name` included) and the category links
    pub fn into_parts(self) -> DbResult<(Fields, Vec<Uuid>)> {
        let fields = Fields::new()
            .set("area_id", self.area_id)
            .set("price", self.price)
            .set("phone_number", self.phone_number)
            .set("working_hours", working_hours_value(&self.working_hours)?)
            .set("name", self.name);
        Ok((fields, self.category_ids))
    }
}

/// Mutable, untranslated doctor fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct DoctorUpdate {
    pub area_id: Option<Uuid>,
    pub price: Option<Decimal>,
    /// `Some(None)` clears the phone number
    pub phone_number: Option<Option<String>>,
    pub working_hours: Option<WorkingHours>,
}

impl DoctorUpdate {
    pub fn apply(self, doctor: &mut Doctor) {
        if let Some(area_id) = self.area_id {
            doctor.area_id = area_id;
        }
        if let Some(price) = self.price {
            doctor.price = price;
        }
        if let Some(phone_number) = self.phone_number {
            doctor.phone_number = phone_number;
        }
        if let Some(working_hours) = self.working_hours {
            doctor.working_hours = Json(working_hours);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::doctors::models::TimeWorking;

    fn doctor() -> Doctor {
        Doctor {
            id: Uuid::new_v4(),
            area_id: Uuid::new_v4(),
            price: Decimal::from(100),
            phone_number: Some("23456789".to_string()),
            working_hours: Json(WorkingHours::default()),
            name: Some("Dr. X".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fields_cover_declared_columns_only() {
        let fields = doctor().fields().unwrap();
        let columns: Vec<&str> = fields.columns().collect();
        assert_eq!(columns, Doctor::COLUMNS);
    }

    #[test]
    fn test_new_doctor_keeps_name_for_translation() {
        let category_id = Uuid::new_v4();
        let new_doctor = NewDoctor {
            area_id: Uuid::new_v4(),
            category_ids: vec![category_id],
            price: Decimal::from(100),
            phone_number: None,
            name: "Dr. X".to_string(),
            working_hours: WorkingHours::default(),
        };

        let (mut fields, category_ids) = new_doctor.into_parts().unwrap();
        assert_eq!(category_ids, vec![category_id]);

        let translated = fields.split_off(&["name"]);
        assert_eq!(
            translated.columns().collect::<Vec<_>>(),
            vec!["name"]
        );
        assert!(fields.columns().all(|c| Doctor::COLUMNS.contains(&c)));
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let mut doctor = doctor();
        let area_id = doctor.area_id;
        let mut hours = WorkingHours::default();
        hours.saturday = TimeWorking::available();

        DoctorUpdate {
            price: Some(Decimal::from(250)),
            phone_number: Some(None),
            working_hours: Some(hours.clone()),
            ..Default::default()
        }
        .apply(&mut doctor);

        assert_eq!(doctor.area_id, area_id);
        assert_eq!(doctor.price, Decimal::from(250));
        assert_eq!(doctor.phone_number, None);
        assert_eq!(doctor.working_hours.0, hours);
    }

    #[test]
    fn test_translation_row_for_owner() {
        let doctor_id = Uuid::new_v4();
        let row = DoctorTranslation::for_owner(
            doctor_id,
            Language::Chinese,
            Fields::new().set("name", "陳大文"),
        )
        .unwrap();

        assert_eq!(row.doctor_id, doctor_id);
        assert_eq!(row.language_code, "zh_CN");
        assert_eq!(row.name.as_deref(), Some("陳大文"));

        let fields = row.fields().unwrap();
        let columns: Vec<&str> = fields.columns().collect();
        assert_eq!(columns, DoctorTranslation::COLUMNS);
    }

    #[test]
    fn test_binding_names_satellite_type() {
        let binding = Doctor::TRANSLATION.unwrap();
        assert_eq!(binding.table, DoctorTranslation::TABLE);
        assert_eq!(binding.owner_foreign_key(), "doctor_id");
    }

    #[test]
    fn test_links_have_no_timestamps() {
        assert!(!DoctorCategory::has_column("created_at"));
        assert!(DoctorCategory::has_column("category_id"));
    }
}
