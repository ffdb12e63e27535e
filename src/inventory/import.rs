//! CSV Import
//!
//! Loads products and sales from CSV exports. Columns are matched by
//! header name, so column order does not matter.
//!
//! Products: `sku,name,category,price,quantity[,reorder_level]`
//! Sales: `sku,quantity,sold_at[,unit_price]`

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::error::{InventoryError, InventoryResult};
use super::store::InventoryStore;
use super::types::{Product, Sale};

/// Outcome of an import
#[derive(Debug, Default)]
pub struct ImportReport {
    pub rows_processed: usize,
    pub rows_imported: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn rows_failed(&self) -> usize {
        self.rows_processed - self.rows_imported
    }
}

#[derive(Debug, Deserialize)]
struct ProductRecord {
    sku: String,
    name: String,
    category: String,
    price: f64,
    quantity: u32,
    #[serde(default)]
    reorder_level: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SaleRecord {
    sku: String,
    quantity: u32,
    sold_at: String,
    #[serde(default)]
    unit_price: Option<f64>,
}

/// Import products from a CSV file
pub fn import_products_csv(store: &mut InventoryStore, path: &Path) -> InventoryResult<ImportReport> {
    let file = std::fs::File::open(path)?;
    let report = import_products(store, file)?;
    tracing::info!(
        path = ?path,
        imported = report.rows_imported,
        failed = report.rows_failed(),
        "Imported products"
    );
    Ok(report)
}

/// Import sales from a CSV file. Products are looked up by SKU and must
/// already exist; stock levels are not changed.
pub fn import_sales_csv(store: &mut InventoryStore, path: &Path) -> InventoryResult<ImportReport> {
    let file = std::fs::File::open(path)?;
    let report = import_sales(store, file)?;
    tracing::info!(
        path = ?path,
        imported = report.rows_imported,
        failed = report.rows_failed(),
        "Imported sales"
    );
    Ok(report)
}

/// Import products from any reader. Bad rows are reported, not fatal.
pub fn import_products<R: Read>(store: &mut InventoryStore, reader: R) -> InventoryResult<ImportReport> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut report = ImportReport::default();

    for (row, result) in csv_reader.deserialize::<ProductRecord>().enumerate() {
        report.rows_processed += 1;

        let outcome = result.map_err(InventoryError::from).and_then(|record| {
            let product = Product::new(record.sku, record.name, record.category)
                .price(record.price)
                .quantity(record.quantity)
                .reorder_level(record.reorder_level.unwrap_or(0));
            store.add_product(product)
        });

        match outcome {
            Ok(_) => report.rows_imported += 1,
            // +2: header row and 1-based numbering
            Err(e) => report.errors.push(format!("row {}: {}", row + 2, e)),
        }
    }

    Ok(report)
}

/// Import sales from any reader. Bad rows are reported, not fatal.
pub fn import_sales<R: Read>(store: &mut InventoryStore, reader: R) -> InventoryResult<ImportReport> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut report = ImportReport::default();

    for (row, result) in csv_reader.deserialize::<SaleRecord>().enumerate() {
        report.rows_processed += 1;

        let outcome = result.map_err(InventoryError::from).and_then(|record| {
            let product = store.product_by_sku(&record.sku).ok_or_else(|| InventoryError::Invalid {
                field: "sku".to_string(),
                reason: format!("unknown product '{}'", record.sku),
            })?;
            let unit_price = record.unit_price.unwrap_or(product.price);
            let sold_at = parse_timestamp(&record.sold_at)?;
            let sale = Sale::new(product.id, record.quantity, unit_price).sold_at(sold_at);
            store.import_sale(sale)
        });

        match outcome {
            Ok(_) => report.rows_imported += 1,
            Err(e) => report.errors.push(format!("row {}: {}", row + 2, e)),
        }
    }

    Ok(report)
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare date (taken as noon UTC)
fn parse_timestamp(s: &str) -> InventoryResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(12, 0, 0))
    {
        return Ok(dt.and_utc());
    }

    Err(InventoryError::Invalid {
        field: "sold_at".to_string(),
        reason: format!("unrecognized timestamp '{}'", s),
    })
}
