//! Core domain models and logic for the catalog browser
//!
//! This crate contains:
//! - Product records as returned by the spreadsheet API
//! - The pure filter/sort stage
//! - Aggregate stats and the card render stage

pub mod error;
pub mod filter;
pub mod record;
pub mod render;
pub mod stats;

pub use error::{CoreError, Result};
pub use filter::{FilterState, SortKey, StatusFilter, apply_filters};
pub use record::{Field, LOW_STOCK_THRESHOLD, ProductRecord, StockStatus, parse_catalog};
pub use render::{ContactTemplate, ProductCard, ResultsView, StockBadge, render};
pub use stats::CatalogStats;
