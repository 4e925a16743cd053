//! Seed loader: fetch the remote feed and replace the store contents

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::{info, warn};
use salesdash_config::FeedConfig;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::models::{Transaction, TransactionId};
use crate::reports::SeedReport;
use crate::store::{ReplaceMode, StoreRef};

/// One record as it appears in the feed. Only `id` is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    pub id: TransactionId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub sold: bool,
    #[serde(default)]
    pub date_of_sale: Option<String>,
}

/// Parse a feed timestamp into UTC.
///
/// Accepts RFC 3339 with an offset, a naive `YYYY-MM-DDTHH:MM:SS[.fff]`
/// (space separator also allowed) or a bare `YYYY-MM-DD`. Naive values are
/// taken as UTC.
pub fn parse_date_of_sale(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Turn feed records into stored transactions, deriving `year`/`month`
pub fn transform(records: Vec<FeedRecord>) -> Vec<Transaction> {
    records
        .into_iter()
        .map(|record| {
            let date_of_sale = record.date_of_sale.as_deref().and_then(|raw| {
                let parsed = parse_date_of_sale(raw);
                if parsed.is_none() {
                    warn!("Unparseable dateOfSale '{}' for id {}; storing without date", raw, record.id);
                }
                parsed
            });

            Transaction {
                id: record.id,
                title: record.title,
                description: record.description,
                price: record.price,
                category: record.category,
                image: record.image,
                sold: record.sold,
                date_of_sale: None,
                year: None,
                month: None,
            }
            .with_date_of_sale(date_of_sale)
        })
        .collect()
}

/// Source of seed records
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> CoreResult<Vec<FeedRecord>>;
}

/// Feed fetched over HTTP as one JSON array
pub struct HttpFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpFeed {
    pub fn new(config: &FeedConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch(&self) -> CoreResult<Vec<FeedRecord>> {
        info!("Fetching seed feed from {}", self.url);
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Replaces the whole store with a fresh copy of the feed
pub struct SeedLoader {
    feed: Arc<dyn FeedSource>,
    store: StoreRef,
    mode: ReplaceMode,
}

impl SeedLoader {
    pub fn new(feed: Arc<dyn FeedSource>, store: StoreRef, mode: ReplaceMode) -> Self {
        Self { feed, store, mode }
    }

    /// Fetch, transform and replace. The store is untouched if the fetch fails.
    pub async fn initialize(&self) -> CoreResult<SeedReport> {
        let records = transform(self.feed.fetch().await?);
        let undated = records.iter().filter(|r| r.date_of_sale.is_none()).count();

        let inserted = self.store.replace_all(&records, self.mode).await?;
        info!(
            "Seeded {} transactions ({} without a sale date, {:?})",
            inserted, undated, self.mode
        );

        Ok(SeedReport {
            message: "Database seeded successfully".to_string(),
            inserted,
        })
    }
}
