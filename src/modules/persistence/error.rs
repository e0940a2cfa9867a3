use lazy_static::lazy_static;
use regex::Regex;
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

/// PostgreSQL SQLSTATE codes the save path knows how to classify
const UNIQUE_VIOLATION: &str = "23505";
const EXCLUSION_VIOLATION: &str = "23P01";
const FOREIGN_KEY_VIOLATION: &str = "23503";

lazy_static! {
    /// `Key (doctor_id, language_code)=(..., en_GB) already exists.`
    static ref UNIQUE_DETAIL: Regex = Regex::new(r"Key \(([^)]*)\)=\(.*\) already exists").unwrap();

    /// `Key (room_id, during)=(...) conflicts with existing key (room_id, during)=(...).`
    static ref OVERLAP_DETAIL: Regex =
        Regex::new(r"Key \(([^)]*)\)=\(.*\) conflicts with existing key").unwrap();

    /// `Key (area_id)=(...) is not present in table "areas".`
    static ref FOREIGN_KEY_DETAIL: Regex =
        Regex::new(r"Key \(([^)]*)\)=\(.*\) is not present in table").unwrap();
}

/// Errors produced by the data-access layer
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unique constraint violated for {entity}: {field}")]
    UniqueConstraintViolation { entity: &'static str, field: String },

    #[error("Range overlapped for {entity}: {field}")]
    RangeOverlapViolation { entity: &'static str, field: String },

    #[error("Foreign key constraint violated for {entity}: {field}")]
    ForeignKeyViolation { entity: &'static str, field: String },

    /// Malformed filter/sort expression or unknown field. Always a programming error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error for {entity}: {source}")]
    Storage {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

/// Constraint violation recognised from a storage error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Unique(String),
    RangeOverlap(String),
    ForeignKey(String),
}

impl DbError {
    /// Classify a sqlx error raised while reading or writing `entity`.
    ///
    /// Constraint violations become typed variants. Anything else is logged
    /// and wrapped unchanged in [`DbError::Storage`].
    pub fn from_sqlx(entity: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let detail = db_err
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(|pg| pg.detail())
                .unwrap_or_else(|| db_err.message());

            if let Some(violation) =
                classify_violation(db_err.code().as_deref(), detail, db_err.constraint())
            {
                tracing::warn!(entity, ?violation, "Constraint violation");
                return match violation {
                    Violation::Unique(field) => DbError::UniqueConstraintViolation { entity, field },
                    Violation::RangeOverlap(field) => DbError::RangeOverlapViolation { entity, field },
                    Violation::ForeignKey(field) => DbError::ForeignKeyViolation { entity, field },
                };
            }
        }

        tracing::error!(entity, error = ?err, "Unclassified storage error");
        DbError::Storage { entity, source: err }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueConstraintViolation { .. }
                | DbError::RangeOverlapViolation { .. }
                | DbError::ForeignKeyViolation { .. }
        )
    }
}

/// Map a SQLSTATE code and the server's detail text to a [`Violation`].
///
/// The conflicting field comes from the `Key (...)` part of the detail. When
/// the detail cannot be parsed the constraint name is reported instead.
pub fn classify_violation(
    code: Option<&str>,
    detail: &str,
    constraint: Option<&str>,
) -> Option<Violation> {
    let fallback = || constraint.unwrap_or("unknown").to_string();
    let capture = |re: &Regex| {
        re.captures(detail)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    };

    match code? {
        UNIQUE_VIOLATION => Some(Violation::Unique(
            capture(&UNIQUE_DETAIL).unwrap_or_else(fallback),
        )),
        EXCLUSION_VIOLATION => {
            let field = capture(&OVERLAP_DETAIL)
                .and_then(|fields| fields.split(',').next().map(|f| f.trim().to_string()))
                .unwrap_or_else(fallback);
            Some(Violation::RangeOverlap(field))
        }
        FOREIGN_KEY_VIOLATION => Some(Violation::ForeignKey(
            capture(&FOREIGN_KEY_DETAIL).unwrap_or_else(fallback),
        )),
        _ => None,
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
