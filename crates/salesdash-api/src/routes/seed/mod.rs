//! Seed routes - Replace the store contents from the remote feed

pub mod api;

pub use api::api_initialize_database;
