//! Core layer - configuration, database pool, HTTP plumbing and errors

pub mod config;
pub mod database;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod openapi;
