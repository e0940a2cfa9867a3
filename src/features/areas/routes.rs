use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::areas::handlers;
use crate::features::areas::services::AreaService;

/// Create routes for the areas feature
pub fn routes(service: Arc<AreaService>) -> Router {
    Router::new()
        .route("/api/areas", get(handlers::list_areas))
        .route("/api/areas/", get(handlers::list_areas))
        .with_state(service)
}
