//! Database schema definitions using sea-query.

use sea_query::Iden;

/// Transactions table schema.
#[derive(Iden, Clone, Copy)]
pub enum Transactions {
    Table,
    #[iden = "seq"]
    Seq,
    #[iden = "external_id"]
    ExternalId,
    #[iden = "title"]
    Title,
    #[iden = "description"]
    Description,
    #[iden = "price"]
    Price,
    #[iden = "price_text"]
    PriceText,
    #[iden = "category"]
    Category,
    #[iden = "image"]
    Image,
    #[iden = "sold"]
    Sold,
    #[iden = "date_of_sale"]
    DateOfSale,
    #[iden = "year"]
    Year,
    #[iden = "month"]
    Month,
    #[iden = "title_key"]
    TitleKey,
    #[iden = "description_key"]
    DescriptionKey,
}

/// Columns read back for listings, in order.
pub const RECORD_COLUMNS: [Transactions; 11] = [
    Transactions::ExternalId,
    Transactions::Title,
    Transactions::Description,
    Transactions::Price,
    Transactions::PriceText,
    Transactions::Category,
    Transactions::Image,
    Transactions::Sold,
    Transactions::DateOfSale,
    Transactions::Year,
    Transactions::Month,
];

/// Columns written on insert: the record columns plus the lowercased search keys.
pub const INSERT_COLUMNS: [Transactions; 13] = [
    Transactions::ExternalId,
    Transactions::Title,
    Transactions::Description,
    Transactions::Price,
    Transactions::PriceText,
    Transactions::Category,
    Transactions::Image,
    Transactions::Sold,
    Transactions::DateOfSale,
    Transactions::Year,
    Transactions::Month,
    Transactions::TitleKey,
    Transactions::DescriptionKey,
];

/// SQL for creating the transactions table.
pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    price REAL NOT NULL,
    price_text TEXT NOT NULL,
    category TEXT NOT NULL,
    image TEXT,
    sold INTEGER NOT NULL,
    date_of_sale INTEGER,
    year INTEGER,
    month INTEGER,
    title_key TEXT NOT NULL,
    description_key TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_date_of_sale ON transactions(date_of_sale);
"#;
