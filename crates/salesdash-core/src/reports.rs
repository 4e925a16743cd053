//! Report structures for API responses

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Paginated listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub message: String,
    pub total: u64,
    pub transactions: Vec<Transaction>,
    pub page: u64,
    pub per_page: u64,
}

/// Sold/unsold totals for a period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStatistics {
    pub total_sales_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
}

/// One histogram bucket; `max` is `None` for open-ended buckets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    pub label: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub count: u64,
}

/// Width of a histogram bin
pub const PRICE_BUCKET_WIDTH: f64 = 100.0;
/// Number of fixed-width bins starting at zero
pub const PRICE_BUCKET_BINS: usize = 9;
/// Index of the `[900, inf)` bucket
pub const PRICE_OVERFLOW_BUCKET: usize = PRICE_BUCKET_BINS;
/// Index of the bucket for prices no boundary covers
pub const PRICE_OTHER_BUCKET: usize = PRICE_BUCKET_BINS + 1;
/// Total number of buckets in a histogram
pub const PRICE_BUCKET_COUNT: usize = PRICE_BUCKET_BINS + 2;

impl PriceBucket {
    /// Build the full, ordered histogram from per-index counts.
    /// Indices outside the bucket range are ignored.
    pub fn histogram(counts: impl IntoIterator<Item = (usize, u64)>) -> Vec<PriceBucket> {
        let mut buckets: Vec<PriceBucket> = (0..PRICE_BUCKET_COUNT).map(Self::empty).collect();
        for (index, count) in counts {
            if let Some(bucket) = buckets.get_mut(index) {
                bucket.count += count;
            }
        }
        buckets
    }

    fn empty(index: usize) -> PriceBucket {
        let lower = index as f64 * PRICE_BUCKET_WIDTH;
        match index {
            i if i < PRICE_BUCKET_BINS => PriceBucket {
                label: format!("{}-{}", lower, lower + PRICE_BUCKET_WIDTH),
                min: Some(lower),
                max: Some(lower + PRICE_BUCKET_WIDTH),
                count: 0,
            },
            PRICE_OVERFLOW_BUCKET => PriceBucket {
                label: format!("{}-above", lower),
                min: Some(lower),
                max: None,
                count: 0,
            },
            _ => PriceBucket {
                label: "other".to_string(),
                min: None,
                max: None,
                count: 0,
            },
        }
    }
}

/// Records per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Category breakdown for a month, or an explicit "no data" answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryBreakdown {
    Found {
        message: String,
        month: u32,
        year: i32,
        data: Vec<CategoryCount>,
    },
    NoData {
        message: String,
    },
}

/// Everything the dashboard needs for one month in one payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedView {
    pub transactions: Vec<Transaction>,
    pub statistics: SalesStatistics,
    pub bar_chart: Vec<PriceBucket>,
    pub pie_chart: Vec<CategoryCount>,
}

/// Outcome of a seed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedReport {
    pub message: String,
    pub inserted: u64,
}
