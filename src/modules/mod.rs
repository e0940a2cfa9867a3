//! Modules layer - Infrastructure components shared by the features
//!
//! Contains the translation-aware persistence layer every entity is stored through.

pub mod persistence;
