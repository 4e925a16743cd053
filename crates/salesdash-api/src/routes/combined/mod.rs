//! Combined route - Listing, statistics and both charts for one month

pub mod api;

pub use api::api_combined;
