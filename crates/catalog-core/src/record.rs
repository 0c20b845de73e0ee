//! Product record domain model
//!
//! Records come from a spreadsheet-backed API, so every field is optional and
//! untrusted. Accessors never fail: malformed numbers coerce to 0 and missing
//! text is reported as `None`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::{CoreError, Result};

/// Stock counts in `1..=LOW_STOCK_THRESHOLD` count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Named fields of a catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    PartNumber,
    ImageUrl,
    CurrentStock,
    PricePerUnit,
    StockStatus,
    LastOrderDate,
    Category,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::PartNumber,
        Field::ImageUrl,
        Field::CurrentStock,
        Field::PricePerUnit,
        Field::StockStatus,
        Field::LastOrderDate,
        Field::Category,
    ];

    /// Exact column header used by the remote sheet, stray spaces included
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "Name of item ",
            Field::PartNumber => "Part or Item Number",
            Field::ImageUrl => "Img url of item",
            Field::CurrentStock => "Current Stock",
            Field::PricePerUnit => "Price Per Unit",
            Field::StockStatus => "Stock Status",
            Field::LastOrderDate => "Last Order Date",
            Field::Category => "Category",
        }
    }
}

/// Stock status label, compared exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Other,
}

impl StockStatus {
    pub const IN_STOCK: &'static str = "In Stock";
    pub const OUT_OF_STOCK: &'static str = "Out of Stock";

    pub fn from_label(label: &str) -> Self {
        match label {
            Self::IN_STOCK => StockStatus::InStock,
            Self::OUT_OF_STOCK => StockStatus::OutOfStock,
            _ => StockStatus::Other,
        }
    }
}

/// One catalog item, kept as the raw field map returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord(Map<String, Value>);

impl ProductRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Set a field under its canonical key
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        self.0.insert(field.key().to_string(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Raw value of a field. Falls back to a whitespace-insensitive key match.
    pub fn get(&self, field: Field) -> Option<&Value> {
        let key = field.key();
        self.0.get(key).or_else(|| {
            let wanted = key.trim();
            self.0
                .iter()
                .find(|(k, _)| k.trim() == wanted)
                .map(|(_, v)| v)
        })
    }

    /// Field as display text. Empty strings and nulls are treated as missing.
    pub fn text(&self, field: Field) -> Option<String> {
        self.get(field)
            .and_then(value_text)
            .filter(|text| !text.is_empty())
    }

    pub fn name(&self) -> Option<String> {
        self.text(Field::Name)
    }

    pub fn part_number(&self) -> Option<String> {
        self.text(Field::PartNumber)
    }

    pub fn image_url(&self) -> Option<String> {
        self.text(Field::ImageUrl)
    }

    pub fn status_label(&self) -> Option<String> {
        self.text(Field::StockStatus)
    }

    pub fn last_order_date(&self) -> Option<String> {
        self.text(Field::LastOrderDate)
    }

    pub fn category(&self) -> Option<String> {
        self.text(Field::Category)
    }

    pub fn status(&self) -> StockStatus {
        match self.get(Field::StockStatus) {
            Some(Value::String(label)) => StockStatus::from_label(label),
            _ => StockStatus::Other,
        }
    }

    /// Current stock as an integer, 0 when missing or unparseable
    pub fn stock(&self) -> i64 {
        match self.get(Field::CurrentStock) {
            Some(Value::Number(n)) => number_as_int(n),
            Some(Value::String(s)) => leading_int(s),
            _ => None,
        }
        .unwrap_or(0)
    }

    /// Unit price, 0 when missing, unparseable or non-finite
    pub fn price(&self) -> f64 {
        match self.get(Field::PricePerUnit) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => leading_float(s),
            _ => None,
        }
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
    }

    pub fn is_in_stock(&self) -> bool {
        self.status() == StockStatus::InStock
    }

    /// In stock with a positive count at or below the low-stock threshold
    pub fn is_low_stock(&self) -> bool {
        self.is_in_stock() && (1..=LOW_STOCK_THRESHOLD).contains(&self.stock())
    }
}

impl From<Map<String, Value>> for ProductRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Parse an API response body into records
pub fn parse_catalog(body: &[u8]) -> Result<Vec<ProductRecord>> {
    serde_json::from_slice(body).map_err(CoreError::from)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Integral floats print without a fraction so part number 1234.0 searches as "1234".
fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn number_as_int(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// Leading integer of `text`: optional sign, digits, anything after is ignored
pub(crate) fn leading_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Leading decimal of `text`, including an optional exponent
pub(crate) fn leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ProductRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("12"), Some(12));
        assert_eq!(leading_int("  7 pcs"), Some(7));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("5.9"), Some(5));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("100"), Some(100.0));
        assert_eq!(leading_float("99.5 INR"), Some(99.5));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("1e3"), Some(1000.0));
        assert_eq!(leading_float("2e"), Some(2.0));
        assert_eq!(leading_float("bad"), None);
        assert_eq!(leading_float("."), None);
    }

    #[test]
    fn test_exact_keys() {
        let r = record(json!({
            "Name of item ": "Marine Ply",
            "Part or Item Number": 1234,
            "Current Stock": "8",
            "Price Per Unit": "2450.50",
            "Stock Status": "In Stock",
        }));
        assert_eq!(r.name().as_deref(), Some("Marine Ply"));
        assert_eq!(r.part_number().as_deref(), Some("1234"));
        assert_eq!(r.stock(), 8);
        assert_eq!(r.price(), 2450.5);
        assert_eq!(r.status(), StockStatus::InStock);
        assert!(r.is_low_stock());
    }

    #[test]
    fn test_trimmed_key_fallback() {
        let r = record(json!({ "Name of item": "Hinge", " Price Per Unit ": 12 }));
        assert_eq!(r.name().as_deref(), Some("Hinge"));
        assert_eq!(r.price(), 12.0);
    }

    #[test]
    fn test_malformed_fields_coerce() {
        let r = record(json!({
            "Current Stock": "n/a",
            "Price Per Unit": "bad",
            "Stock Status": null,
            "Name of item ": "",
        }));
        assert_eq!(r.stock(), 0);
        assert_eq!(r.price(), 0.0);
        assert_eq!(r.status(), StockStatus::Other);
        assert_eq!(r.name(), None);
        assert!(!r.is_low_stock());
    }

    #[test]
    fn test_numeric_json_values() {
        let r = record(json!({ "Current Stock": 4.7, "Part or Item Number": 55.0 }));
        assert_eq!(r.stock(), 4);
        assert_eq!(r.part_number().as_deref(), Some("55"));
    }

    #[test]
    fn test_status_is_exact() {
        assert_eq!(StockStatus::from_label("In Stock"), StockStatus::InStock);
        assert_eq!(StockStatus::from_label("in stock"), StockStatus::Other);
        assert_eq!(StockStatus::from_label("Out of Stock"), StockStatus::OutOfStock);
    }

    #[test]
    fn test_parse_catalog() {
        let body = br#"[{"Name of item ": "A"}, {"Category": "Ply"}]"#;
        let records = parse_catalog(body).unwrap();
        assert_eq!(records.len(), 2);
        assert!(parse_catalog(b"<html>").is_err());
        assert!(parse_catalog(b"{\"error\": true}").is_err());
    }
}
