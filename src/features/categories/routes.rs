use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/", get(handlers::list_categories))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_server, unconnected_pool};
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use serde_json::Value;

    #[tokio::test]
    async fn test_unsupported_language_is_rejected_before_querying() {
        let service = Arc::new(CategoryService::new(unconnected_pool()));
        let server = test_server(routes(service));

        let response = server
            .get("/api/categories/")
            .add_header(
                HeaderName::from_static("x-language-code"),
                HeaderValue::from_static("fr_FR"),
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["detail"], "Unsupported language code 'fr_FR'");
    }
}
