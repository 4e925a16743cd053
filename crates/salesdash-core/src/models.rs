//! Core data models for the transaction store

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// External identifier as it appears in the seed feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionId::Number(n) => write!(f, "{}", n),
            TransactionId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for TransactionId {
    fn from(n: i64) -> Self {
        TransactionId::Number(n)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        TransactionId::Text(s.to_string())
    }
}

/// Transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Identifier from the source feed
    pub id: TransactionId,
    /// Product title
    pub title: String,
    /// Product description
    pub description: String,
    /// Sale price
    pub price: f64,
    /// Category label
    pub category: String,
    /// Product image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the item sold
    pub sold: bool,
    /// Timestamp of sale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_sale: Option<DateTime<Utc>>,
    /// Calendar year of `date_of_sale`, fixed at seed time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Calendar month (1-12) of `date_of_sale`, fixed at seed time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl Transaction {
    /// Set the sale date and derive `year`/`month` from it
    pub fn with_date_of_sale(mut self, date: Option<DateTime<Utc>>) -> Self {
        self.date_of_sale = date;
        self.year = date.map(|d| d.year());
        self.month = date.map(|d| d.month());
        self
    }

    /// Price rendered the way search compares it (`44` rather than `44.0`)
    pub fn price_text(&self) -> String {
        self.price.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Transaction {
        Transaction {
            id: TransactionId::Number(1),
            title: "Fjallraven Backpack".to_string(),
            description: "Fits 15 inch laptops".to_string(),
            price: 329.85,
            category: "men's clothing".to_string(),
            image: None,
            sold: false,
            date_of_sale: None,
            year: None,
            month: None,
        }
    }

    #[test]
    fn test_derived_date_fields() {
        let date = Utc.with_ymd_and_hms(2021, 11, 27, 14, 59, 54).unwrap();
        let tx = sample().with_date_of_sale(Some(date));
        assert_eq!(tx.year, Some(2021));
        assert_eq!(tx.month, Some(11));

        let tx = tx.with_date_of_sale(None);
        assert_eq!(tx.year, None);
        assert_eq!(tx.month, None);
    }

    #[test]
    fn test_price_text() {
        let mut tx = sample();
        assert_eq!(tx.price_text(), "329.85");
        tx.price = 44.0;
        assert_eq!(tx.price_text(), "44");
    }

    #[test]
    fn test_serializes_camel_case_and_omits_missing_dates() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert!(json.get("dateOfSale").is_none());
        assert!(json.get("year").is_none());

        let date = Utc.with_ymd_and_hms(2022, 3, 15, 0, 0, 0).unwrap();
        let json = serde_json::to_value(sample().with_date_of_sale(Some(date))).unwrap();
        assert_eq!(json["dateOfSale"], "2022-03-15T00:00:00Z");
        assert_eq!(json["month"], 3);
    }

    #[test]
    fn test_id_keeps_json_type() {
        let numeric: TransactionId = serde_json::from_str("42").unwrap();
        let text: TransactionId = serde_json::from_str("\"sku-42\"").unwrap();
        assert_eq!(numeric, TransactionId::Number(42));
        assert_eq!(text, TransactionId::from("sku-42"));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");
        assert_eq!(text.to_string(), "sku-42");
    }
}
