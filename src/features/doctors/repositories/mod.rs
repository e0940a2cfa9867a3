mod doctor_repository;

pub use doctor_repository::{DoctorRepository, CATEGORY_FILTER_FIELD};
