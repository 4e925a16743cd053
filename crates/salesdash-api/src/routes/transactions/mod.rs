//! Transaction routes - Listing with search and pagination
//!
//! Query parameters:
//! - page: 1-based page number (default 1)
//! - perPage: page size (default and cap from config)
//! - search: case-insensitive substring of title, description or price

pub mod api;

pub use api::api_all_transactions;
