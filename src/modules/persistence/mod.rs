//! Translation-aware data access.
//!
//! Entities describe their table through [`Entity`]; translatable ones are
//! [`Translated`], name their [`Translation`] satellite and add a
//! [`TranslationBinding`] for the per-language join. The generic
//! [`Repository`] then provides get/filter/all/save for all of them and
//! create for translated ones, with filters compiled from `field[__operator]`
//! entries.

pub mod entity;
pub mod error;
pub mod filter;
pub mod query;
pub mod repository;
pub mod translation;
pub mod value;

pub use entity::{Commit, Entity, Translated, Translation};
pub use error::{DbError, DbResult};
pub use filter::{Filters, Operand, Predicate, Sort};
pub use query::SelectQuery;
pub use repository::Repository;
pub use translation::TranslationBinding;
pub use value::{Fields, SqlValue};
