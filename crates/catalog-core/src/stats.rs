//! Aggregate counters over the unfiltered catalog

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::{ProductRecord, StockStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub low_stock: usize,
    /// Distinct category values; a missing category counts as one value
    pub categories: usize,
}

impl CatalogStats {
    /// Recompute every counter from scratch
    pub fn compute(all: &[ProductRecord]) -> Self {
        let mut stats = CatalogStats {
            total: all.len(),
            ..Default::default()
        };
        let mut categories = HashSet::new();

        for product in all {
            match product.status() {
                StockStatus::InStock => stats.in_stock += 1,
                StockStatus::OutOfStock => stats.out_of_stock += 1,
                StockStatus::Other => {}
            }
            if product.is_low_stock() {
                stats.low_stock += 1;
            }
            categories.insert(product.category());
        }

        stats.categories = categories.len();
        stats
    }

    /// Category counter as shown in the header, e.g. `12+`
    pub fn categories_label(&self) -> String {
        format!("{}+", self.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_catalog() {
        assert_eq!(CatalogStats::compute(&[]), CatalogStats::default());
    }

    #[test]
    fn test_counts() {
        let all: Vec<ProductRecord> = serde_json::from_value(json!([
            { "Stock Status": "In Stock", "Current Stock": "3", "Category": "Ply" },
            { "Stock Status": "In Stock", "Current Stock": "40", "Category": "Ply" },
            { "Stock Status": "In Stock", "Current Stock": "0", "Category": "Hardware" },
            { "Stock Status": "Out of Stock", "Current Stock": "0" },
            { "Stock Status": "Discontinued", "Category": "Hardware" },
        ]))
        .unwrap();

        let stats = CatalogStats::compute(&all);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.in_stock, 3);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.categories, 3);
        assert_eq!(stats.categories_label(), "3+");
    }
}
