//! Core inventory types
//!
//! - `Product`: a stocked item and its current quantity
//! - `Sale`: one recorded sale of a product

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::pagination::Sortable;

/// A stocked product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    /// Stock keeping unit, unique across the store
    pub sku: String,
    pub name: String,
    pub category: String,
    /// Unit price
    pub price: f64,
    /// Units currently in stock
    pub quantity: u32,
    /// At or below this quantity the product counts as low stock
    #[serde(default)]
    pub reorder_level: u32,
}

impl Product {
    /// Create a product; the id is assigned when it is added to a store
    pub fn new(sku: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: 0,
            sku: sku.into(),
            name: name.into(),
            category: category.into(),
            price: 0.0,
            quantity: 0,
            reorder_level: 0,
        }
    }

    /// Builder method: set unit price
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Builder method: set stock quantity
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Builder method: set reorder level
    pub fn reorder_level(mut self, level: u32) -> Self {
        self.reorder_level = level;
        self
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Value of the units on hand
    pub fn stock_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

impl Sortable for Product {
    fn sort_keys() -> &'static [&'static str] {
        &["name", "sku", "category", "price", "quantity", "id"]
    }

    fn compare_by(&self, other: &Self, key: &str) -> Ordering {
        match key {
            "name" => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            "sku" => self.sku.cmp(&other.sku),
            "category" => self.category.cmp(&other.category),
            "price" => self.price.total_cmp(&other.price),
            "quantity" => self.quantity.cmp(&other.quantity),
            "id" => self.id.cmp(&other.id),
            _ => Ordering::Equal,
        }
    }
}

/// A recorded sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: u32,
    pub product_id: u32,
    pub quantity: u32,
    /// Price per unit at the time of sale
    pub unit_price: f64,
    pub sold_at: DateTime<Utc>,
}

impl Sale {
    pub fn new(product_id: u32, quantity: u32, unit_price: f64) -> Self {
        Self {
            id: 0,
            product_id,
            quantity,
            unit_price,
            sold_at: Utc::now(),
        }
    }

    /// Builder method: set sale time
    pub fn sold_at(mut self, sold_at: DateTime<Utc>) -> Self {
        self.sold_at = sold_at;
        self
    }

    pub fn revenue(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

impl Sortable for Sale {
    fn sort_keys() -> &'static [&'static str] {
        &["soldAt", "revenue", "quantity", "productId", "id"]
    }

    fn compare_by(&self, other: &Self, key: &str) -> Ordering {
        match key {
            "soldAt" => self.sold_at.cmp(&other.sold_at),
            "revenue" => self.revenue().total_cmp(&other.revenue()),
            "quantity" => self.quantity.cmp(&other.quantity),
            "productId" => self.product_id.cmp(&other.product_id),
            "id" => self.id.cmp(&other.id),
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_builder() {
        let p = Product::new("KB-001", "Keyboard", "peripherals")
            .price(49.5)
            .quantity(4)
            .reorder_level(5);
        assert_eq!(p.sku, "KB-001");
        assert!(p.is_low_stock());
        assert_eq!(p.stock_value(), 198.0);
    }

    #[test]
    fn test_product_name_sort_ignores_case() {
        let a = Product::new("A", "apple", "fruit");
        let b = Product::new("B", "Banana", "fruit");
        assert_eq!(a.compare_by(&b, "name"), Ordering::Less);
    }

    #[test]
    fn test_sale_revenue() {
        let sale = Sale::new(1, 3, 2.5);
        assert_eq!(sale.revenue(), 7.5);
    }
}
