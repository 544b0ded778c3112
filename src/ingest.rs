//! Tabular ingestion: the order and user CSV sources.
//!
//! Loading is the only place raw strings become typed values. Each order row
//! passes column-wise through the price, timestamp, and sentinel normalizers
//! exactly once; the derived fields on [`Order`] are never recomputed or
//! mutated downstream.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use encoding_rs::Encoding;
use log::info;

use crate::{cluster::UserRecord, currency, io_utils, timestamp};

/// Upstream markers for "no value". Matched verbatim after trimming; a field
/// reduced to one of these is absent, and absent fields never participate in
/// matching or aggregation.
pub const SENTINELS: &[&str] = &["", "null", "NULL"];

/// Maps a raw field to `None` when empty or a null sentinel.
pub fn scrub_sentinel(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if SENTINELS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One cleaned order row with every derived field computed at load time.
#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub book_id: String,
    /// Raw quantity parsed as a non-negative integer; anything else is absent.
    pub quantity: Option<i64>,
    /// The source price string, kept for provenance and currency detection.
    pub raw_unit_price: Option<String>,
    /// Cleaned unit price in the source currency.
    pub unit_price: Option<f64>,
    /// Multiplier to the canonical currency, decided from the raw string.
    pub currency_factor: f64,
    /// Unit price converted to the canonical currency.
    pub unit_price_usd: Option<f64>,
    /// quantity × canonical unit price; defined only when both factors are.
    pub paid_price: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub shipping: Option<String>,
}

struct OrderColumns {
    order_id: usize,
    user_id: usize,
    book_id: usize,
    unit_price: usize,
    quantity: usize,
    timestamp: usize,
    shipping: usize,
}

impl OrderColumns {
    fn resolve(headers: &[String]) -> Result<Self> {
        Ok(Self {
            order_id: required_column(headers, "order_id")?,
            user_id: required_column(headers, "user_id")?,
            book_id: required_column(headers, "book_id")?,
            unit_price: required_column(headers, "unit_price")?,
            quantity: required_column(headers, "quantity")?,
            timestamp: required_column(headers, "timestamp")?,
            shipping: required_column(headers, "shipping")?,
        })
    }
}

/// Reads and cleans the order table.
pub fn load_orders(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<Order>> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading header row from {path:?}"))?;
    let columns = OrderColumns::resolve(&headers)
        .with_context(|| format!("Resolving order columns in {path:?}"))?;

    let mut orders = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let fields = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        orders.push(clean_order(&fields, &columns));
    }
    info!("Ingested {} order row(s) from {:?}", orders.len(), path);
    Ok(orders)
}

fn clean_order(fields: &[String], columns: &OrderColumns) -> Order {
    let field = |idx: usize| fields.get(idx).map(|s| s.as_str()).unwrap_or("");

    let raw_unit_price = scrub_sentinel(field(columns.unit_price));
    let quantity = scrub_sentinel(field(columns.quantity))
        .and_then(|q| q.parse::<i64>().ok())
        .filter(|q| *q >= 0);
    let unit_price = currency::clean_price(raw_unit_price.as_deref());
    let currency_factor = currency::currency_factor(raw_unit_price.as_deref());
    let unit_price_usd = unit_price.map(|p| p * currency_factor);
    let paid_price = match (quantity, unit_price_usd) {
        (Some(quantity), Some(unit)) => Some(quantity as f64 * unit),
        _ => None,
    };
    let parsed_ts = timestamp::parse_timestamp(scrub_sentinel(field(columns.timestamp)).as_deref());
    let date = parsed_ts.map(|ts| ts.date_naive());

    Order {
        order_id: field(columns.order_id).trim().to_string(),
        user_id: field(columns.user_id).trim().to_string(),
        book_id: field(columns.book_id).trim().to_string(),
        quantity,
        raw_unit_price,
        unit_price,
        currency_factor,
        unit_price_usd,
        paid_price,
        timestamp: parsed_ts,
        date,
        year: date.map(|d| d.year()),
        month: date.map(|d| d.month()),
        day: date.map(|d| d.day()),
        shipping: scrub_sentinel(field(columns.shipping)),
    }
}

/// Reads the user table, scrubbing identity-field sentinels.
pub fn load_users(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<UserRecord>> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading header row from {path:?}"))?;
    let id = required_column(&headers, "id")?;
    let email = required_column(&headers, "email")?;
    let phone = required_column(&headers, "phone")?;
    let address = required_column(&headers, "address")?;
    let name = required_column(&headers, "name")?;

    let mut users = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let fields = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        let field = |idx: usize| fields.get(idx).map(|s| s.as_str()).unwrap_or("");
        users.push(UserRecord {
            id: field(id).trim().to_string(),
            email: scrub_sentinel(field(email)),
            phone: scrub_sentinel(field(phone)),
            address: scrub_sentinel(field(address)),
            name: scrub_sentinel(field(name)),
        });
    }
    info!("Ingested {} user row(s) from {:?}", users.len(), path);
    Ok(users)
}

fn required_column(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("Column '{name}' not found in header row"))
}
