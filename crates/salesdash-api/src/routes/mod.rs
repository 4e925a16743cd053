//! Route modules for the API server
//!
//! - seed: reseed the store from the remote feed
//! - transactions: paginated, searchable listing
//! - charts: monthly statistics, price histogram and category counts
//! - combined: every dashboard widget for one month in a single payload
//!
//! Each module keeps its handlers in `api.rs`.

pub mod charts;
pub mod combined;
pub mod params;
pub mod seed;
pub mod transactions;
