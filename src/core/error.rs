use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::modules::persistence::DbError;
use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    /// Pool/connection level failure outside any entity operation
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Persistence(#[from] DbError),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// `"{Model} is not found {id}"`
    pub fn not_found(model: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} is not found {}", model, id))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::Persistence(ref e) => match e {
                DbError::UniqueConstraintViolation { .. } | DbError::RangeOverlapViolation { .. } => {
                    (StatusCode::CONFLICT, e.to_string())
                }
                DbError::ForeignKeyViolation { .. } => (StatusCode::BAD_REQUEST, e.to_string()),
                DbError::Configuration(msg) => {
                    tracing::error!("Configuration error: {}", msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
                DbError::Storage { entity, source } => {
                    tracing::error!(entity, "Storage error: {:?}", source);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error occurred".to_string(),
                    )
                }
            },
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("Doctor", "42");
        assert_eq!(err.to_string(), "Doctor is not found 42");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_persistence_status_codes() {
        let unique = AppError::from(DbError::UniqueConstraintViolation {
            entity: "DoctorTranslation",
            field: "doctor_id, language_code".to_string(),
        });
        assert_eq!(unique.into_response().status(), StatusCode::CONFLICT);

        let foreign_key = AppError::from(DbError::ForeignKeyViolation {
            entity: "Doctor",
            field: "area_id".to_string(),
        });
        assert_eq!(foreign_key.into_response().status(), StatusCode::BAD_REQUEST);

        let configuration = AppError::from(DbError::Configuration("bad".to_string()));
        assert_eq!(
            configuration.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let storage = AppError::from(DbError::Storage {
            entity: "Doctor",
            source: sqlx::Error::PoolTimedOut,
        });
        assert_eq!(
            storage.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
