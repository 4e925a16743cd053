//! SQLite implementation of the transaction store.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::{debug, info};
use salesdash_config::StoreConfig;
use sea_query::{Alias, Cond, Expr, LikeExpr, Order, Query, SelectStatement, SimpleExpr, SqliteQueryBuilder};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::schema::{Transactions, CREATE_TRANSACTIONS_TABLE, INSERT_COLUMNS, RECORD_COLUMNS};
use super::{ReplaceMode, TransactionFilter, TransactionStore};
use crate::error::{CoreError, CoreResult};
use crate::models::{Transaction, TransactionId};
use crate::reports::{
    CategoryCount, PriceBucket, SalesStatistics, PRICE_BUCKET_BINS, PRICE_BUCKET_WIDTH,
    PRICE_OTHER_BUCKET, PRICE_OVERFLOW_BUCKET,
};

/// Rows per INSERT statement during a reseed
const INSERT_BATCH: usize = 500;

/// SQLite implementation of TransactionStore.
#[derive(Clone)]
pub struct SqliteTransactionStore {
    pool: SqlitePool,
}

impl SqliteTransactionStore {
    /// Create a store over an existing pool. Call [`init`](Self::init) before use.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for the configured URL and create the schema.
    ///
    /// An in-memory database only lives as long as its connection, so it gets a
    /// single connection that is never recycled.
    pub async fn connect(config: &StoreConfig) -> CoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?
        };

        let store = Self::new(pool);
        store.init().await?;
        info!("Transaction store ready at {}", config.url);
        Ok(store)
    }

    /// Fresh private in-memory store
    pub async fn in_memory() -> CoreResult<Self> {
        Self::connect(&StoreConfig::default()).await
    }

    /// Initialize the database schema.
    pub async fn init(&self) -> CoreResult<()> {
        sqlx::raw_sql(CREATE_TRANSACTIONS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    fn delete_all_sql() -> String {
        Query::delete()
            .from_table(Transactions::Table)
            .to_string(SqliteQueryBuilder)
    }

    fn insert_sql(records: &[Transaction]) -> CoreResult<String> {
        let mut insert = Query::insert();
        insert.into_table(Transactions::Table).columns(INSERT_COLUMNS);
        for record in records {
            insert.values(record_values(record)?)?;
        }
        Ok(insert.to_string(SqliteQueryBuilder))
    }

    fn find_sql(filter: &TransactionFilter, skip: u64, limit: u64) -> String {
        let mut query = Query::select();
        query
            .columns(RECORD_COLUMNS)
            .from(Transactions::Table)
            .order_by(Transactions::Seq, Order::Asc)
            .limit(limit)
            .offset(skip);
        filtered_sql(query, filter)
    }

    fn count_sql(filter: &TransactionFilter) -> String {
        let mut query = Query::select();
        query
            .expr_as(Expr::cust("COUNT(*)"), Alias::new("count"))
            .from(Transactions::Table);
        filtered_sql(query, filter)
    }

    fn sum_price_sql(filter: &TransactionFilter) -> String {
        let mut query = Query::select();
        // TOTAL() is 0.0 on an empty set where SUM() would be NULL.
        query
            .expr_as(Expr::cust("TOTAL(price)"), Alias::new("total"))
            .from(Transactions::Table);
        filtered_sql(query, filter)
    }

    fn sales_summary_sql(filter: &TransactionFilter) -> String {
        let mut query = Query::select();
        query
            .expr_as(
                Expr::cust("TOTAL(CASE WHEN sold = 1 THEN price END)"),
                Alias::new("sales_amount"),
            )
            .expr_as(
                Expr::cust("COALESCE(SUM(CASE WHEN sold = 1 THEN 1 ELSE 0 END), 0)"),
                Alias::new("sold_count"),
            )
            .expr_as(
                Expr::cust("COALESCE(SUM(CASE WHEN sold = 0 THEN 1 ELSE 0 END), 0)"),
                Alias::new("unsold_count"),
            )
            .from(Transactions::Table);
        filtered_sql(query, filter)
    }

    fn price_histogram_sql(filter: &TransactionFilter) -> String {
        let mut query = Query::select();
        query
            .expr_as(Expr::cust(bucket_expr()), Alias::new("bucket"))
            .expr_as(Expr::cust("COUNT(*)"), Alias::new("count"))
            .from(Transactions::Table)
            .add_group_by([Expr::cust(bucket_expr())]);
        filtered_sql(query, filter)
    }

    fn category_counts_sql(filter: &TransactionFilter) -> String {
        let mut query = Query::select();
        query
            .column(Transactions::Category)
            .expr_as(Expr::cust("COUNT(*)"), Alias::new("count"))
            .from(Transactions::Table)
            .group_by_col(Transactions::Category)
            .order_by(Transactions::Category, Order::Asc);
        filtered_sql(query, filter)
    }

    async fn fetch_all(&self, sql: String) -> CoreResult<Vec<SqliteRow>> {
        debug!("store query: {}", sql);
        Ok(sqlx::query(&sql).fetch_all(&self.pool).await?)
    }

    async fn fetch_one(&self, sql: String) -> CoreResult<SqliteRow> {
        debug!("store query: {}", sql);
        Ok(sqlx::query(&sql).fetch_one(&self.pool).await?)
    }
}

/// Values for one row, in [`INSERT_COLUMNS`] order
fn record_values(record: &Transaction) -> CoreResult<Vec<SimpleExpr>> {
    let external_id = serde_json::to_string(&record.id).map_err(|e| CoreError::StoreError {
        message: format!("cannot encode id {}: {}", record.id, e),
    })?;

    Ok(vec![
        external_id.into(),
        record.title.clone().into(),
        record.description.clone().into(),
        record.price.into(),
        record.price_text().into(),
        record.category.clone().into(),
        record.image.clone().into(),
        i32::from(record.sold).into(),
        record.date_of_sale.map(|d| d.timestamp_millis()).into(),
        record.year.into(),
        record.month.into(),
        record.title.to_lowercase().into(),
        record.description.to_lowercase().into(),
    ])
}

fn decode_record(row: &SqliteRow) -> CoreResult<Transaction> {
    let external_id: String = row.try_get("external_id")?;
    let id: TransactionId = serde_json::from_str(&external_id).map_err(|e| CoreError::StoreError {
        message: format!("corrupt id '{}': {}", external_id, e),
    })?;

    let date_of_sale = match row.try_get::<Option<i64>, _>("date_of_sale")? {
        Some(millis) => Some(Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            CoreError::StoreError {
                message: format!("corrupt sale timestamp {} for id {}", millis, id),
            }
        })?),
        None => None,
    };

    let sold: i64 = row.try_get("sold")?;
    let year: Option<i64> = row.try_get("year")?;
    let month: Option<i64> = row.try_get("month")?;

    Ok(Transaction {
        id,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        image: row.try_get("image")?,
        sold: sold != 0,
        date_of_sale,
        year: year.map(|y| y as i32),
        month: month.map(|m| m as u32),
    })
}

/// Escape character for LIKE patterns
const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcards so the search text matches literally
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Apply the filter and render the statement
fn filtered_sql(mut query: SelectStatement, filter: &TransactionFilter) -> String {
    apply_filter(&mut query, filter);
    query.to_string(SqliteQueryBuilder)
}

fn apply_filter(query: &mut SelectStatement, filter: &TransactionFilter) {
    if filter.period.is_none() && filter.sold.is_none() && filter.search.is_none() {
        return;
    }

    let mut cond = Cond::all();
    if let Some(period) = filter.period {
        cond = cond
            .add(Expr::col(Transactions::DateOfSale).gte(period.start().timestamp_millis()))
            .add(Expr::col(Transactions::DateOfSale).lt(period.end().timestamp_millis()));
    }
    if let Some(sold) = filter.sold {
        cond = cond.add(Expr::col(Transactions::Sold).eq(i32::from(sold)));
    }
    if let Some(ref text) = filter.search {
        // SQLite LIKE folds ASCII case only, so match the lowercased key columns.
        let pattern = like_pattern(&text.to_lowercase());
        let matches = |column: Transactions| {
            Expr::col(column).like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE))
        };
        cond = cond.add(
            Cond::any()
                .add(matches(Transactions::TitleKey))
                .add(matches(Transactions::DescriptionKey))
                .add(matches(Transactions::PriceText)),
        );
    }
    query.cond_where(cond);
}

/// Bucket index for the price histogram, computed in SQL
fn bucket_expr() -> String {
    let cap = PRICE_BUCKET_WIDTH * PRICE_BUCKET_BINS as f64;
    format!(
        "CASE WHEN price >= 0 AND price < {cap} THEN CAST(price / {width} AS INTEGER) \
         WHEN price >= {cap} THEN {overflow} ELSE {other} END",
        cap = cap,
        width = PRICE_BUCKET_WIDTH,
        overflow = PRICE_OVERFLOW_BUCKET,
        other = PRICE_OTHER_BUCKET,
    )
}

#[async_trait]
impl TransactionStore for SqliteTransactionStore {
    async fn replace_all(&self, records: &[Transaction], mode: ReplaceMode) -> CoreResult<u64> {
        let delete = Self::delete_all_sql();
        let inserts = records
            .chunks(INSERT_BATCH)
            .map(Self::insert_sql)
            .collect::<CoreResult<Vec<_>>>()?;

        match mode {
            ReplaceMode::Atomic => {
                let mut tx = self.pool.begin().await?;
                sqlx::query(&delete).execute(&mut *tx).await?;
                for sql in &inserts {
                    sqlx::query(sql).execute(&mut *tx).await?;
                }
                tx.commit().await?;
            }
            ReplaceMode::DeleteThenInsert => {
                sqlx::query(&delete).execute(&self.pool).await?;
                for sql in &inserts {
                    sqlx::query(sql).execute(&self.pool).await?;
                }
            }
        }

        debug!("replaced store contents with {} records ({:?})", records.len(), mode);
        Ok(records.len() as u64)
    }

    async fn find(&self, filter: &TransactionFilter, skip: u64, limit: u64) -> CoreResult<Vec<Transaction>> {
        let sql = Self::find_sql(filter, skip, limit);
        self.fetch_all(sql).await?.iter().map(decode_record).collect()
    }

    async fn count(&self, filter: &TransactionFilter) -> CoreResult<u64> {
        let sql = Self::count_sql(filter);
        let count: i64 = self.fetch_one(sql).await?.try_get("count")?;
        Ok(count as u64)
    }

    async fn sum_price(&self, filter: &TransactionFilter) -> CoreResult<f64> {
        let sql = Self::sum_price_sql(filter);
        Ok(self.fetch_one(sql).await?.try_get("total")?)
    }

    async fn sales_summary(&self, filter: &TransactionFilter) -> CoreResult<SalesStatistics> {
        let sql = Self::sales_summary_sql(filter);
        let row = self.fetch_one(sql).await?;
        let sold: i64 = row.try_get("sold_count")?;
        let unsold: i64 = row.try_get("unsold_count")?;
        Ok(SalesStatistics {
            total_sales_amount: row.try_get("sales_amount")?,
            total_sold_items: sold as u64,
            total_not_sold_items: unsold as u64,
        })
    }

    async fn price_histogram(&self, filter: &TransactionFilter) -> CoreResult<Vec<PriceBucket>> {
        let sql = Self::price_histogram_sql(filter);
        let counts = self
            .fetch_all(sql)
            .await?
            .iter()
            .map(|row| -> CoreResult<(usize, u64)> {
                let bucket: i64 = row.try_get("bucket")?;
                let count: i64 = row.try_get("count")?;
                Ok((bucket as usize, count as u64))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(PriceBucket::histogram(counts))
    }

    async fn category_counts(&self, filter: &TransactionFilter) -> CoreResult<Vec<CategoryCount>> {
        let sql = Self::category_counts_sql(filter);
        self.fetch_all(sql)
            .await?
            .iter()
            .map(|row| {
                let count: i64 = row.try_get("count")?;
                Ok(CategoryCount {
                    category: row.try_get("category")?,
                    count: count as u64,
                })
            })
            .collect()
    }
}

// ==================== Tests ====================
