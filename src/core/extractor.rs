use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::Query;
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::shared::language::Language;

/// Header carrying the language of the request
pub const LANGUAGE_HEADER: &str = "x-language-code";

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Query string extractor accepting repeated keys (`?id=a&id=b`) for `Vec`
/// fields; malformed queries become 400 responses with a `detail` body
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| AppError::BadRequest(format!("Invalid query: {}", rejection)))
    }
}

/// Active language of the request, from `X-Language-Code` (default `en_GB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLanguage(pub Language);

impl<S> FromRequestParts<S> for ActiveLanguage
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(LANGUAGE_HEADER) else {
            return Ok(Self(Language::default()));
        };

        let code = value
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid X-Language-Code header".to_string()))?;
        code.trim()
            .parse::<Language>()
            .map(Self)
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }
}
