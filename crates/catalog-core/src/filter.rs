//! Filter / sort stage
//!
//! `apply_filters` is a pure function of the full catalog and the current
//! `FilterState`: search, then status, then a stable sort. Re-applying it with
//! the same inputs yields the same ordered sequence.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};

use crate::record::ProductRecord;
use crate::CoreError;

/// Status filter selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    InStock,
    OutOfStock,
    LowStock,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::InStock,
        StatusFilter::OutOfStock,
        StatusFilter::LowStock,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::InStock => "in-stock",
            StatusFilter::OutOfStock => "out-of-stock",
            StatusFilter::LowStock => "low-stock",
        }
    }

    pub fn matches(self, product: &ProductRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::InStock => product.is_in_stock(),
            StatusFilter::OutOfStock => {
                product.status() == crate::record::StockStatus::OutOfStock
            }
            StatusFilter::LowStock => product.is_low_stock(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFilter(s.to_string()))
    }
}

/// Sort order selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    Stock,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Stock,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Stock => "stock",
        }
    }

    /// Next key in selector order, wrapping around
    pub fn next(self) -> Self {
        let idx = SortKey::ALL.iter().position(|k| *k == self).unwrap_or(0);
        SortKey::ALL[(idx + 1) % SortKey::ALL.len()]
    }

    fn compare(self, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        match self {
            SortKey::Name => compare_names(
                &a.name().unwrap_or_default(),
                &b.name().unwrap_or_default(),
            ),
            SortKey::PriceLow => compare_f64(a.price(), b.price()),
            SortKey::PriceHigh => compare_f64(b.price(), a.price()),
            SortKey::Stock => b.stock().cmp(&a.stock()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSortKey(s.to_string()))
    }
}

/// Current search, status filter and sort selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub sort: SortKey,
}

impl FilterState {
    pub fn new(search: impl Into<String>, status: StatusFilter, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            status,
            sort,
        }
    }
}

/// Search, filter and sort the full catalog
pub fn apply_filters<'a>(all: &'a [ProductRecord], state: &FilterState) -> Vec<&'a ProductRecord> {
    let needle = state.search.trim().to_lowercase();

    let mut products: Vec<&ProductRecord> = all
        .iter()
        .filter(|product| matches_search(product, &needle))
        .filter(|product| state.status.matches(product))
        .collect();

    // Vec::sort_by is stable, so ties keep catalog order.
    products.sort_by(|a, b| state.sort.compare(a, b));
    products
}

fn matches_search(product: &ProductRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let name = product.name().unwrap_or_default().trim().to_lowercase();
    let part_number = product.part_number().unwrap_or_default().to_lowercase();
    name.contains(needle) || part_number.contains(needle)
}

thread_local! {
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// Root-locale collation: accents and case are secondary to the base letters,
/// and on a case-only difference lowercase sorts first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => fold_case(a).cmp(fold_case(b)).then_with(|| b.cmp(a)),
    })
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
