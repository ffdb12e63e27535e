//! Inventory store
//!
//! An owned collection of products and sales. There is no global store:
//! whoever creates an `InventoryStore` owns it, and hands out access the
//! way it sees fit (the API server wraps one per router in a lock, the CLI
//! and tests hold theirs directly).

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

use super::error::{InventoryError, InventoryResult};
use super::types::{Product, Sale};
use crate::pagination::{paginate, Page, PageRequest};

/// Products and sales for one dashboard
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    products: Vec<Product>,
    sales: Vec<Sale>,
    /// SKU -> index into `products`
    sku_index: HashMap<String, usize>,
    next_product_id: u32,
    next_sale_id: u32,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self {
            next_product_id: 1,
            next_sale_id: 1,
            ..Default::default()
        }
    }

    /// Add a product, assigning it the next id
    pub fn add_product(&mut self, mut product: Product) -> InventoryResult<u32> {
        validate_product(&product)?;

        if self.sku_index.contains_key(&product.sku) {
            return Err(InventoryError::DuplicateSku(product.sku));
        }

        product.id = self.next_id_for_product();
        let id = product.id;
        self.sku_index.insert(product.sku.clone(), self.products.len());
        self.products.push(product);

        tracing::debug!(product_id = id, "Added product");
        Ok(id)
    }

    pub fn product(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_by_sku(&self, sku: &str) -> Option<&Product> {
        self.sku_index.get(sku).map(|&idx| &self.products[idx])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// Sell `quantity` units of a product at its current price.
    ///
    /// Fails without changing anything if the product is unknown or there
    /// are not enough units on hand.
    pub fn record_sale(
        &mut self,
        product_id: u32,
        quantity: u32,
        sold_at: Option<DateTime<Utc>>,
    ) -> InventoryResult<Sale> {
        if quantity == 0 {
            return Err(invalid("quantity", "must be at least 1"));
        }

        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(InventoryError::ProductNotFound(product_id))?;

        if product.quantity < quantity {
            return Err(InventoryError::InsufficientStock {
                product_id,
                requested: quantity,
                available: product.quantity,
            });
        }

        product.quantity -= quantity;
        let unit_price = product.price;
        let low_stock = product.is_low_stock();

        let mut sale = Sale::new(product_id, quantity, unit_price);
        if let Some(ts) = sold_at {
            sale = sale.sold_at(ts);
        }
        sale.id = self.next_id_for_sale();
        self.sales.push(sale.clone());

        tracing::info!(product_id, quantity, sale_id = sale.id, "Recorded sale");
        if low_stock {
            tracing::warn!(product_id, "Product is at or below its reorder level");
        }

        Ok(sale)
    }

    /// Add a historical sale without touching stock levels
    pub fn import_sale(&mut self, mut sale: Sale) -> InventoryResult<u32> {
        if sale.quantity == 0 {
            return Err(invalid("quantity", "must be at least 1"));
        }
        if !sale.unit_price.is_finite() || sale.unit_price < 0.0 {
            return Err(invalid("unit_price", "must be a non-negative number"));
        }
        if self.product(sale.product_id).is_none() {
            return Err(InventoryError::ProductNotFound(sale.product_id));
        }
        sale.id = self.next_id_for_sale();
        let id = sale.id;
        self.sales.push(sale);
        Ok(id)
    }

    pub fn list_products(&self, request: &PageRequest) -> Page<Product> {
        paginate(&self.products, request)
    }

    pub fn list_sales(&self, request: &PageRequest) -> Page<Sale> {
        paginate(&self.sales, request)
    }

    /// A small store with sample products and sales
    pub fn demo() -> Self {
        let mut store = Self::new();

        let catalogue = [
            ("KB-100", "Mechanical Keyboard", "peripherals", 89.0, 42, 10),
            ("MS-200", "Wireless Mouse", "peripherals", 29.5, 120, 25),
            ("MN-270", "27\" Monitor", "displays", 249.0, 8, 10),
            ("MN-320", "32\" 4K Monitor", "displays", 429.0, 5, 3),
            ("HD-050", "USB-C Hub", "accessories", 39.9, 64, 15),
            ("CB-010", "HDMI Cable 2m", "accessories", 9.5, 300, 50),
            ("LP-140", "14\" Laptop Stand", "accessories", 34.0, 17, 5),
            ("HS-330", "Noise Cancelling Headset", "audio", 159.0, 23, 8),
            ("SP-120", "Desk Speakers", "audio", 79.0, 2, 4),
            ("WC-108", "1080p Webcam", "peripherals", 59.0, 31, 10),
            ("DK-400", "Docking Station", "accessories", 189.0, 12, 4),
            ("MP-900", "XL Mouse Pad", "accessories", 19.0, 80, 20),
        ];

        for (sku, name, category, price, quantity, reorder) in catalogue {
            let product = Product::new(sku, name, category)
                .price(price)
                .quantity(quantity)
                .reorder_level(reorder);
            if let Err(e) = store.add_product(product) {
                tracing::warn!("Skipping demo product {}: {}", sku, e);
            }
        }

        // (product_id, quantity, month, day)
        let history = [
            (1, 3, 1, 12),
            (2, 10, 1, 15),
            (3, 1, 1, 28),
            (8, 2, 2, 3),
            (5, 6, 2, 14),
            (6, 25, 2, 20),
            (1, 4, 3, 2),
            (4, 1, 3, 9),
            (11, 2, 3, 18),
            (10, 3, 4, 1),
            (2, 7, 4, 11),
            (12, 9, 4, 22),
        ];

        for (product_id, quantity, month, day) in history {
            let unit_price = store.product(product_id).map(|p| p.price).unwrap_or(0.0);
            let sold_at = Utc
                .with_ymd_and_hms(2024, month, day, 12, 0, 0)
                .single()
                .unwrap_or_else(Utc::now);
            let sale = Sale::new(product_id, quantity, unit_price).sold_at(sold_at);
            if let Err(e) = store.import_sale(sale) {
                tracing::warn!("Skipping demo sale: {}", e);
            }
        }

        store
    }

    fn next_id_for_product(&mut self) -> u32 {
        let id = self.next_product_id.max(1);
        self.next_product_id = id + 1;
        id
    }

    fn next_id_for_sale(&mut self) -> u32 {
        let id = self.next_sale_id.max(1);
        self.next_sale_id = id + 1;
        id
    }
}

fn validate_product(product: &Product) -> InventoryResult<()> {
    if product.sku.trim().is_empty() {
        return Err(invalid("sku", "must not be empty"));
    }
    if product.name.trim().is_empty() {
        return Err(invalid("name", "must not be empty"));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(invalid("price", "must be a non-negative number"));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> InventoryError {
    InventoryError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
