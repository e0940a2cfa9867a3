pub mod constants;
pub mod language;
pub mod test_helpers;
pub mod types;
pub mod validation;
