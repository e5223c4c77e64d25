//! Dashboard figures computed from fetched records.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use stockroom_query::RecordDate;

use crate::models::{Product, Sale};

/// Stock level of a product relative to its reorder threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

impl StockStatus {
    pub fn of(quantity: u32, threshold: u32) -> Self {
        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity <= threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header figures of the inventory screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    /// Sum of quantity times buying price.
    pub total_value: f64,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub categories: Vec<String>,
}

impl InventorySummary {
    pub fn from_products(products: &[Product]) -> Self {
        let mut summary = InventorySummary {
            total_products: products.len(),
            total_value: 0.0,
            low_stock: 0,
            out_of_stock: 0,
            categories: Vec::new(),
        };
        let mut categories = BTreeSet::new();

        for product in products {
            summary.total_value += product.stock_value();
            match product.stock_status() {
                StockStatus::LowStock => summary.low_stock += 1,
                StockStatus::OutOfStock => summary.out_of_stock += 1,
                StockStatus::InStock => {}
            }
            if !product.category.is_empty() {
                categories.insert(product.category.as_str());
            }
        }

        summary.categories = categories.into_iter().map(String::from).collect();
        summary
    }
}

/// Per-category buying totals for the reports screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category: String,
    /// Sum of buying prices in the category.
    pub turnover: f64,
    pub count: usize,
    pub average: f64,
}

impl CategoryStat {
    /// One entry per category, sorted by category name. Products without a
    /// category are grouped under `N/A`.
    pub fn from_products(products: &[Product]) -> Vec<CategoryStat> {
        let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for product in products {
            let category = match product.category.trim() {
                "" => "N/A",
                c => c,
            };
            let entry = totals.entry(category).or_insert((0.0, 0));
            entry.0 += product.buying_price;
            entry.1 += 1;
        }

        totals
            .into_iter()
            .map(|(category, (turnover, count))| CategoryStat {
                category: category.to_string(),
                turnover,
                count,
                average: turnover / count as f64,
            })
            .collect()
    }
}

/// Stock value added in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub total: f64,
}

/// Monthly totals of quantity times buying price, keyed by the month each
/// product was created, in chronological order. Products without a valid
/// `createdAt` are left out.
pub fn monthly_totals(products: &[Product]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for product in products {
        let Some(day) = product.created_at.as_ref().and_then(|d| d.record_date()) else {
            continue;
        };
        let month = day.format("%Y-%m").to_string();
        *months.entry(month).or_insert(0.0) += product.stock_value();
    }

    months
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// Sales figures for the reports overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOverview {
    pub sales: usize,
    /// Sum of sale totals.
    pub revenue: f64,
    /// Sum of price times quantity over every cart line.
    pub net_purchase_value: f64,
    pub profit: f64,
}

impl SalesOverview {
    pub fn from_sales(sales: &[Sale]) -> Self {
        let revenue: f64 = sales.iter().map(|s| s.total_amount).sum();
        let net_purchase_value: f64 = sales
            .iter()
            .flat_map(|s| s.cart.iter())
            .map(|line| line.price * f64::from(line.quantity))
            .sum();

        SalesOverview {
            sales: sales.len(),
            revenue,
            net_purchase_value,
            profit: revenue - net_purchase_value,
        }
    }
}
