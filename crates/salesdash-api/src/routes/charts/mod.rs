//! Chart routes - Monthly statistics, price histogram, category distribution
//!
//! Every endpoint requires `month` (1-12) and `year`.

pub mod api;

pub use api::{api_bar_chart, api_categories_count, api_statistics};
