//! Transaction store interface
//!
//! The store owns every record. Queries and aggregations are pushed down to
//! the backing database; the query service only composes them.

pub mod schema;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::models::Transaction;
use crate::period::MonthPeriod;
use crate::reports::{CategoryCount, PriceBucket, SalesStatistics};

pub use sqlite::SqliteTransactionStore;

/// Store reference type
pub type StoreRef = std::sync::Arc<dyn TransactionStore>;

/// How a reseed swaps the old dataset for the new one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMode {
    /// Delete and insert inside one transaction; readers see old or new data
    Atomic,
    /// Delete, then insert as separate statements; readers may see a gap
    DeleteThenInsert,
}

impl ReplaceMode {
    pub fn from_atomic(atomic: bool) -> Self {
        if atomic {
            ReplaceMode::Atomic
        } else {
            ReplaceMode::DeleteThenInsert
        }
    }
}

/// Record filter shared by every query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Sale date within this month
    pub period: Option<MonthPeriod>,
    /// Sold flag equals this value
    pub sold: Option<bool>,
    /// Case-insensitive substring of title, description or price text
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Match everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a month
    pub fn in_period(period: MonthPeriod) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    /// Also require the sold flag
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    /// Also require a search match; blank text is ignored
    pub fn search(mut self, text: &str) -> Self {
        let text = text.trim();
        self.search = if text.is_empty() { None } else { Some(text.to_string()) };
        self
    }
}

/// Trait for transaction stores
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Remove every record and insert `records`; returns the number inserted
    async fn replace_all(&self, records: &[Transaction], mode: ReplaceMode) -> CoreResult<u64>;

    /// Matching records in insertion order
    async fn find(&self, filter: &TransactionFilter, skip: u64, limit: u64) -> CoreResult<Vec<Transaction>>;

    /// Number of matching records
    async fn count(&self, filter: &TransactionFilter) -> CoreResult<u64>;

    /// Sum of `price` over matching records, 0 when none match
    async fn sum_price(&self, filter: &TransactionFilter) -> CoreResult<f64>;

    /// Sold amount and sold/unsold counts in a single aggregation pass
    async fn sales_summary(&self, filter: &TransactionFilter) -> CoreResult<SalesStatistics>;

    /// Matching records bucketed by price; every bucket is present
    async fn price_histogram(&self, filter: &TransactionFilter) -> CoreResult<Vec<PriceBucket>>;

    /// Matching records grouped by category, ordered by category
    async fn category_counts(&self, filter: &TransactionFilter) -> CoreResult<Vec<CategoryCount>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(TransactionFilter::all().search("   ").search, None);
        assert_eq!(TransactionFilter::all().search(" idg ").search.as_deref(), Some("idg"));
    }

    #[test]
    fn test_filter_builders() {
        let period = MonthPeriod::new(2022, 3).unwrap();
        let filter = TransactionFilter::in_period(period).sold(true);
        assert_eq!(filter.period, Some(period));
        assert_eq!(filter.sold, Some(true));
        assert_eq!(ReplaceMode::from_atomic(false), ReplaceMode::DeleteThenInsert);
    }
}
