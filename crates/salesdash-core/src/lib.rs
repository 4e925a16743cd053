//! Core transaction store, seed loader and dashboard queries
//!
//! The [`seed::SeedLoader`] replaces the store contents from the remote feed;
//! the [`query::QueryService`] answers listing, statistics and chart queries by
//! pushing filters and aggregations down to the [`store::TransactionStore`].

pub mod error;
pub mod models;
pub mod period;
pub mod query;
pub mod reports;
pub mod seed;
pub mod store;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails};
pub use models::{Transaction, TransactionId};
pub use period::MonthPeriod;
pub use query::{ListRequest, QueryService, QuerySettings};
pub use reports::{
    CategoryBreakdown, CategoryCount, CombinedView, PriceBucket, SalesStatistics, SeedReport,
    TransactionPage,
};
pub use seed::{FeedRecord, FeedSource, HttpFeed, SeedLoader};
pub use store::{ReplaceMode, SqliteTransactionStore, StoreRef, TransactionFilter, TransactionStore};
