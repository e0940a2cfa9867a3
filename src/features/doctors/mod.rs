//! Doctors with a localized name, an area and any number of categories.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/doctors/` | List doctors by area, categories and price range |
//! | GET | `/api/doctors/{id}` | Get a doctor in the active language |
//! | POST | `/api/doctors/` | Create a doctor, its translation and category links |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::DoctorService;
