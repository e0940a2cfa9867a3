//! Features layer - one module per resource, each with its own models,
//! DTOs, services, handlers and routes

pub mod areas;
pub mod categories;
pub mod doctors;
