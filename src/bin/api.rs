//! Stockroom API Server
//!
//! Run with: cargo run --bin stockroom-api
//!
//! # Configuration
//!
//! Read from `~/.config/stockroom/config.toml`, `/etc/stockroom/config.toml`
//! or `./stockroom.toml`, whichever exists first. Environment variables
//! override the file:
//! - `STOCKROOM_API_HOST`, `STOCKROOM_API_PORT`
//! - `STOCKROOM_PAGE_SIZE`, `STOCKROOM_MAX_PAGE_SIZE`
//! - `STOCKROOM_AUTH_URL`: identity provider userinfo endpoint
//! - `STOCKROOM_ALLOW_GUEST`: serve unauthenticated requests as a guest
//! - `STOCKROOM_PRODUCTS_CSV`, `STOCKROOM_SALES_CSV`: data to load at startup
//! - `STOCKROOM_LOG_LEVEL`, `STOCKROOM_LOG_FORMAT`
//! - `RUST_LOG`: full filter, overrides the log level

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use stockroom::api::{serve, AppState};
use stockroom::auth::{HttpIdentityProvider, IdentityProvider, StaticTokenProvider};
use stockroom::config::{Config, InventoryConfig};
use stockroom::inventory::{import_products_csv, import_sales_csv, ImportReport, InventoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    stockroom::logging::init(&config.logging);

    tracing::info!("Starting Stockroom API server v{}", env!("CARGO_PKG_VERSION"));

    let store = load_inventory(&config.inventory)?;
    tracing::info!(
        products = store.products().len(),
        sales = store.sales().len(),
        "Inventory loaded"
    );

    let identity: Arc<dyn IdentityProvider> = match &config.auth.userinfo_url {
        Some(url) => {
            tracing::info!("Verifying tokens against {}", url);
            Arc::new(HttpIdentityProvider::new(
                url.as_str(),
                Duration::from_millis(config.auth.timeout_ms),
            )?)
        }
        None => {
            tracing::warn!("No identity provider configured (set STOCKROOM_AUTH_URL); all tokens will be rejected");
            Arc::new(StaticTokenProvider::new())
        }
    };

    if config.auth.allow_guest {
        tracing::warn!("Guest access enabled: requests without a token are served as the guest user");
    }

    let state = AppState::from_config(store, identity, &config);

    serve(state, &config.api).await?;

    tracing::info!("Stockroom API server stopped");
    Ok(())
}

/// Build the inventory from CSV files, the demo catalogue, or nothing
fn load_inventory(config: &InventoryConfig) -> anyhow::Result<InventoryStore> {
    if config.products_csv.is_none() {
        if config.sales_csv.is_some() {
            tracing::warn!("Ignoring sales CSV: sales are matched by SKU and no products CSV is set");
        }
        if config.demo_data {
            tracing::info!("Seeding demo inventory");
            return Ok(InventoryStore::demo());
        }
        return Ok(InventoryStore::new());
    }

    let mut store = InventoryStore::new();

    if let Some(path) = &config.products_csv {
        let report = import_products_csv(&mut store, Path::new(path))?;
        log_report("products", path, &report);
    }

    if let Some(path) = &config.sales_csv {
        let report = import_sales_csv(&mut store, Path::new(path))?;
        log_report("sales", path, &report);
    }

    Ok(store)
}

fn log_report(kind: &str, path: &str, report: &ImportReport) {
    tracing::info!(
        kind,
        path,
        imported = report.rows_imported,
        failed = report.rows_failed(),
        "CSV import finished"
    );

    for error in report.errors.iter().take(10) {
        tracing::warn!(kind, "{}", error);
    }
}
