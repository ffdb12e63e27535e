//! Dashboard analytics
//!
//! Aggregates behind the dashboard's chart and goal widgets: monthly
//! revenue, per-category sales, stock summary and goal progress.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::types::{Product, Sale};

/// Revenue and units for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: f64,
    pub units: u64,
}

/// Sales totals for one product category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category: String,
    pub revenue: f64,
    pub units: u64,
    pub products: usize,
}

/// Snapshot of stock on hand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub product_count: usize,
    pub total_units: u64,
    pub stock_value: f64,
    /// SKUs at or below their reorder level
    pub low_stock: Vec<String>,
    pub total_revenue: f64,
    pub sales_count: usize,
}

/// Progress toward a numeric target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub name: String,
    pub target: f64,
    pub achieved: f64,
    /// 0 to 100
    pub percent: f64,
    pub remaining: f64,
    pub reached: bool,
}

impl GoalProgress {
    /// A non-positive target yields 0% and is never reached
    pub fn compute(name: impl Into<String>, target: f64, achieved: f64) -> Self {
        let valid_target = target.is_finite() && target > 0.0;
        let percent = if valid_target {
            (achieved / target * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            name: name.into(),
            target,
            achieved,
            percent,
            remaining: if valid_target { (target - achieved).max(0.0) } else { 0.0 },
            reached: valid_target && achieved >= target,
        }
    }
}

/// Revenue per calendar month, oldest first
pub fn monthly_revenue(sales: &[Sale]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<(i32, u32), (f64, u64)> = BTreeMap::new();

    for sale in sales {
        let key = (sale.sold_at.year(), sale.sold_at.month());
        let entry = months.entry(key).or_insert((0.0, 0));
        entry.0 += sale.revenue();
        entry.1 += u64::from(sale.quantity);
    }

    months
        .into_iter()
        .map(|((year, month), (revenue, units))| MonthlyRevenue {
            month: format!("{:04}-{:02}", year, month),
            revenue,
            units,
        })
        .collect()
}

/// Sales per category, highest revenue first
pub fn category_breakdown(products: &[Product], sales: &[Sale]) -> Vec<CategorySales> {
    let category_of: HashMap<u32, &str> = products
        .iter()
        .map(|p| (p.id, p.category.as_str()))
        .collect();

    let mut totals: HashMap<&str, CategorySales> = HashMap::new();
    for product in products {
        totals
            .entry(product.category.as_str())
            .or_insert_with(|| CategorySales {
                category: product.category.clone(),
                revenue: 0.0,
                units: 0,
                products: 0,
            })
            .products += 1;
    }

    for sale in sales {
        // Sales for products that no longer exist are skipped
        let Some(category) = category_of.get(&sale.product_id) else {
            continue;
        };
        if let Some(entry) = totals.get_mut(category) {
            entry.revenue += sale.revenue();
            entry.units += u64::from(sale.quantity);
        }
    }

    let mut result: Vec<CategorySales> = totals.into_values().collect();
    result.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.category.cmp(&b.category))
    });
    result
}

pub fn summarize(products: &[Product], sales: &[Sale]) -> InventorySummary {
    let mut low_stock: Vec<String> = products
        .iter()
        .filter(|p| p.is_low_stock())
        .map(|p| p.sku.clone())
        .collect();
    low_stock.sort();

    InventorySummary {
        product_count: products.len(),
        total_units: products.iter().map(|p| u64::from(p.quantity)).sum(),
        stock_value: products.iter().map(Product::stock_value).sum(),
        low_stock,
        total_revenue: sales.iter().map(Sale::revenue).sum(),
        sales_count: sales.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sale(product_id: u32, quantity: u32, price: f64, month: u32) -> Sale {
        Sale::new(product_id, quantity, price)
            .sold_at(Utc.with_ymd_and_hms(2024, month, 10, 12, 0, 0).unwrap())
    }

    fn products() -> Vec<Product> {
        let mut a = Product::new("A", "Alpha", "tools").price(10.0).quantity(5).reorder_level(5);
        a.id = 1;
        let mut b = Product::new("B", "Bravo", "toys").price(2.0).quantity(50).reorder_level(10);
        b.id = 2;
        let mut c = Product::new("C", "Charlie", "tools").price(1.0).quantity(0);
        c.id = 3;
        vec![a, b, c]
    }

    #[test]
    fn test_monthly_revenue_groups_and_orders() {
        let sales = vec![sale(1, 2, 10.0, 3), sale(2, 1, 5.0, 1), sale(1, 1, 10.0, 3)];
        let months = monthly_revenue(&sales);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2024-01");
        assert_eq!(months[1].revenue, 30.0);
        assert_eq!(months[1].units, 3);
    }

    #[test]
    fn test_category_breakdown() {
        let sales = vec![sale(1, 1, 10.0, 1), sale(2, 20, 2.0, 1), sale(99, 1, 1000.0, 1)];
        let breakdown = category_breakdown(&products(), &sales);
        assert_eq!(breakdown[0].category, "toys");
        assert_eq!(breakdown[0].revenue, 40.0);
        assert_eq!(breakdown[1].category, "tools");
        assert_eq!(breakdown[1].products, 2);
    }

    #[test]
    fn test_summary() {
        let summary = summarize(&products(), &[sale(2, 1, 2.0, 1)]);
        assert_eq!(summary.product_count, 3);
        assert_eq!(summary.total_units, 55);
        assert_eq!(summary.stock_value, 150.0);
        assert_eq!(summary.low_stock, vec!["A".to_string(), "C".to_string()]);
        assert_eq!(summary.total_revenue, 2.0);
    }

    #[test]
    fn test_goal_progress() {
        let goal = GoalProgress::compute("revenue", 200.0, 50.0);
        assert_eq!(goal.percent, 25.0);
        assert_eq!(goal.remaining, 150.0);
        assert!(!goal.reached);

        let over = GoalProgress::compute("revenue", 100.0, 130.0);
        assert_eq!(over.percent, 100.0);
        assert_eq!(over.remaining, 0.0);
        assert!(over.reached);

        let zero = GoalProgress::compute("revenue", 0.0, 10.0);
        assert_eq!(zero.percent, 0.0);
        assert!(!zero.reached);
    }
}
