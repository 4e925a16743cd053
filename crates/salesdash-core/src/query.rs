//! Query service: dashboard reads composed from store queries

use log::debug;
use salesdash_config::{ChartScope, Config};

use crate::error::{CoreError, CoreResult};
use crate::period::MonthPeriod;
use crate::reports::{CategoryBreakdown, CombinedView, PriceBucket, SalesStatistics, TransactionPage};
use crate::store::{StoreRef, TransactionFilter};

/// Tunables for the query service
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    pub default_per_page: u64,
    pub max_per_page: u64,
    pub combined_limit: u64,
    pub chart_scope: ChartScope,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl QuerySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_per_page: config.pagination.default_per_page,
            max_per_page: config.pagination.max_per_page,
            combined_limit: config.combined.transactions_limit,
            chart_scope: config.combined.chart_scope,
        }
    }
}

/// Listing parameters after query-string decoding
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    /// 1-based page number
    pub page: u64,
    /// Page size; the configured default when absent
    pub per_page: Option<u64>,
    pub search: Option<String>,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: None,
            search: None,
        }
    }
}

/// Answers dashboard queries against a transaction store
pub struct QueryService {
    store: StoreRef,
    settings: QuerySettings,
}

impl QueryService {
    pub fn new(store: StoreRef, settings: QuerySettings) -> Self {
        Self { store, settings }
    }

    pub fn from_config(config: &Config, store: StoreRef) -> Self {
        Self::new(store, QuerySettings::from_config(config))
    }

    /// One page of transactions matching the optional search text
    pub async fn list(&self, request: ListRequest) -> CoreResult<TransactionPage> {
        if request.page == 0 {
            return Err(CoreError::invalid("page must be a positive integer"));
        }
        let per_page = request.per_page.unwrap_or(self.settings.default_per_page);
        if per_page == 0 {
            return Err(CoreError::invalid("perPage must be a positive integer"));
        }
        let per_page = per_page.min(self.settings.max_per_page);

        let mut filter = TransactionFilter::all();
        if let Some(ref search) = request.search {
            filter = filter.search(search);
        }
        debug!("list page={} per_page={} search={:?}", request.page, per_page, filter.search);

        // SQLite offsets are signed 64-bit; a page starting beyond that is empty.
        let skip = (request.page - 1)
            .checked_mul(per_page)
            .filter(|skip| *skip <= i64::MAX as u64);
        let (transactions, total) = match skip {
            Some(skip) => tokio::try_join!(
                self.store.find(&filter, skip, per_page),
                self.store.count(&filter),
            )?,
            None => (Vec::new(), self.store.count(&filter).await?),
        };

        Ok(TransactionPage {
            message: "Transactions fetched successfully".to_string(),
            total,
            transactions,
            page: request.page,
            per_page,
        })
    }

    /// Sold amount and sold/unsold counts for a month
    pub async fn statistics(&self, period: MonthPeriod) -> CoreResult<SalesStatistics> {
        let sold = TransactionFilter::in_period(period).sold(true);
        let unsold = TransactionFilter::in_period(period).sold(false);

        let (total_sold_items, total_not_sold_items, total_sales_amount) = tokio::try_join!(
            self.store.count(&sold),
            self.store.count(&unsold),
            self.store.sum_price(&sold),
        )?;

        Ok(SalesStatistics {
            total_sales_amount,
            total_sold_items,
            total_not_sold_items,
        })
    }

    /// Price histogram for a month
    pub async fn price_histogram(&self, period: MonthPeriod) -> CoreResult<Vec<PriceBucket>> {
        self.store.price_histogram(&TransactionFilter::in_period(period)).await
    }

    /// Per-category counts for a month
    pub async fn category_breakdown(&self, period: MonthPeriod) -> CoreResult<CategoryBreakdown> {
        let data = self.store.category_counts(&TransactionFilter::in_period(period)).await?;
        if data.is_empty() {
            return Ok(CategoryBreakdown::NoData {
                message: "No transactions found for this month".to_string(),
            });
        }
        Ok(CategoryBreakdown::Found {
            message: "Category data fetched successfully".to_string(),
            month: period.month(),
            year: period.year(),
            data,
        })
    }

    /// Listing, statistics and both charts in one payload
    pub async fn combined(&self, period: MonthPeriod) -> CoreResult<CombinedView> {
        let in_period = TransactionFilter::in_period(period);
        let charts = match self.settings.chart_scope {
            ChartScope::AllTime => TransactionFilter::all(),
            ChartScope::Period => in_period.clone(),
        };

        let (transactions, statistics, bar_chart, pie_chart) = tokio::try_join!(
            self.store.find(&in_period, 0, self.settings.combined_limit),
            self.store.sales_summary(&in_period),
            self.store.price_histogram(&charts),
            self.store.category_counts(&charts),
        )?;

        Ok(CombinedView {
            transactions,
            statistics,
            bar_chart,
            pie_chart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Transaction, TransactionId};
    use crate::reports::CategoryCount;
    use crate::store::{ReplaceMode, SqliteTransactionStore, TransactionStore};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn record(id: i64, price: f64, category: &str, sold: bool, (y, m, d): (i32, u32, u32)) -> Transaction {
        Transaction {
            id: TransactionId::Number(id),
            title: format!("Item {}", id),
            description: String::new(),
            price,
            category: category.to_string(),
            image: None,
            sold,
            date_of_sale: None,
            year: None,
            month: None,
        }
        .with_date_of_sale(Some(Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()))
    }

    async fn service_with(records: Vec<Transaction>, settings: QuerySettings) -> QueryService {
        let store = SqliteTransactionStore::in_memory().await.unwrap();
        store.replace_all(&records, ReplaceMode::Atomic).await.unwrap();
        QueryService::new(Arc::new(store), settings)
    }

    /// A: 250 X sold March, B: 150 Y unsold March, C: 50 X sold April
    async fn fixture_service(settings: QuerySettings) -> QueryService {
        service_with(
            vec![
                record(1, 250.0, "X", true, (2022, 3, 15)),
                record(2, 150.0, "Y", false, (2022, 3, 20)),
                record(3, 50.0, "X", true, (2022, 4, 1)),
            ],
            settings,
        )
        .await
    }

    fn march() -> MonthPeriod {
        MonthPeriod::new(2022, 3).unwrap()
    }

    #[tokio::test]
    async fn test_statistics_for_march() {
        let service = fixture_service(QuerySettings::default()).await;
        let stats = service.statistics(march()).await.unwrap();
        assert_eq!(stats.total_sales_amount, 250.0);
        assert_eq!(stats.total_sold_items, 1);
        assert_eq!(stats.total_not_sold_items, 1);
    }

    #[tokio::test]
    async fn test_statistics_empty_month_is_zero() {
        let service = fixture_service(QuerySettings::default()).await;
        let stats = service.statistics(MonthPeriod::new(2022, 5).unwrap()).await.unwrap();
        assert_eq!(stats, SalesStatistics::default());
    }

    #[tokio::test]
    async fn test_category_breakdown() {
        let service = fixture_service(QuerySettings::default()).await;
        let breakdown = service.category_breakdown(march()).await.unwrap();
        match breakdown {
            CategoryBreakdown::Found { month, year, ref data, .. } => {
                assert_eq!((month, year), (3, 2022));
                assert_eq!(
                    data,
                    &vec![
                        CategoryCount { category: "X".to_string(), count: 1 },
                        CategoryCount { category: "Y".to_string(), count: 1 },
                    ]
                );
            }
            other => panic!("expected data, got {:?}", other),
        }

        let empty = service.category_breakdown(MonthPeriod::new(2022, 5).unwrap()).await.unwrap();
        assert_eq!(
            empty,
            CategoryBreakdown::NoData {
                message: "No transactions found for this month".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_histogram_for_march() {
        let service = fixture_service(QuerySettings::default()).await;
        let buckets = service.price_histogram(march()).await.unwrap();
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[2].count, 1);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 2);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let records = (1..=25).map(|i| record(i, i as f64, "X", true, (2022, 1, 1))).collect();
        let service = service_with(records, QuerySettings::default()).await;

        let page = service
            .list(ListRequest { page: 2, per_page: Some(10), search: None })
            .await
            .unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.transactions.first().map(|t| t.id.clone()), Some(TransactionId::Number(11)));
        assert_eq!(page.transactions.last().map(|t| t.id.clone()), Some(TransactionId::Number(20)));

        let last = service
            .list(ListRequest { page: 3, per_page: Some(10), search: None })
            .await
            .unwrap();
        assert_eq!(last.total, 25);
        assert_eq!(last.transactions.len(), 5);
    }

    #[tokio::test]
    async fn test_list_defaults_and_caps_page_size() {
        let records = (1..=30).map(|i| record(i, 1.0, "X", true, (2022, 1, 1))).collect();
        let settings = QuerySettings { max_per_page: 20, ..QuerySettings::default() };
        let service = service_with(records, settings).await;

        let page = service.list(ListRequest::default()).await.unwrap();
        assert_eq!(page.per_page, 10);
        assert_eq!(page.message, "Transactions fetched successfully");

        let capped = service
            .list(ListRequest { page: 1, per_page: Some(500), search: None })
            .await
            .unwrap();
        assert_eq!(capped.per_page, 20);
        assert_eq!(capped.transactions.len(), 20);
    }

    #[tokio::test]
    async fn test_list_rejects_zero() {
        let service = fixture_service(QuerySettings::default()).await;
        let err = service
            .list(ListRequest { page: 0, ..ListRequest::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { .. }));

        let err = service
            .list(ListRequest { per_page: Some(0), ..ListRequest::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { .. }));
    }

    #[tokio::test]
    async fn test_list_far_page_is_empty() {
        let service = fixture_service(QuerySettings::default()).await;
        for page in [1_000_000_000_000_000_000, u64::MAX] {
            let result = service
                .list(ListRequest { page, ..ListRequest::default() })
                .await
                .unwrap();
            assert_eq!(result.total, 3);
            assert_eq!(result.page, page);
            assert!(result.transactions.is_empty());
        }
    }

    #[tokio::test]
    async fn test_list_search_filters_total() {
        let service = fixture_service(QuerySettings::default()).await;
        let page = service
            .list(ListRequest { search: Some("item 2".to_string()), ..ListRequest::default() })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.transactions[0].id, TransactionId::Number(2));

        let blank = service
            .list(ListRequest { search: Some("  ".to_string()), ..ListRequest::default() })
            .await
            .unwrap();
        assert_eq!(blank.total, 3);
    }

    #[tokio::test]
    async fn test_combined_charts_ignore_month_by_default() {
        let service = fixture_service(QuerySettings::default()).await;
        let view = service.combined(march()).await.unwrap();

        assert_eq!(view.transactions.len(), 2);
        assert_eq!(view.statistics.total_sales_amount, 250.0);
        assert_eq!(view.statistics.total_not_sold_items, 1);
        assert_eq!(view.bar_chart.iter().map(|b| b.count).sum::<u64>(), 3);
        assert_eq!(view.pie_chart[0], CategoryCount { category: "X".to_string(), count: 2 });
    }

    #[tokio::test]
    async fn test_combined_period_scope() {
        let settings = QuerySettings {
            chart_scope: ChartScope::Period,
            combined_limit: 1,
            ..QuerySettings::default()
        };
        let service = fixture_service(settings).await;
        let view = service.combined(march()).await.unwrap();

        assert_eq!(view.transactions.len(), 1);
        assert_eq!(view.bar_chart.iter().map(|b| b.count).sum::<u64>(), 2);
        assert_eq!(view.pie_chart[0], CategoryCount { category: "X".to_string(), count: 1 });
    }

    #[tokio::test]
    async fn test_combined_statistics_match_standalone() {
        let service = fixture_service(QuerySettings::default()).await;
        let standalone = service.statistics(march()).await.unwrap();
        let combined = service.combined(march()).await.unwrap().statistics;
        assert_eq!(standalone, combined);
    }
}
