//! Render stage - deterministic projection of filtered records into cards
//!
//! Nothing here can fail: malformed fields degrade to placeholders.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::record::ProductRecord;

/// Three-tier stock badge shown on every card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockBadge {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockBadge {
    pub fn classify(product: &ProductRecord) -> Self {
        if !product.is_in_stock() {
            StockBadge::OutOfStock
        } else if product.is_low_stock() {
            StockBadge::LowStock
        } else {
            StockBadge::InStock
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockBadge::OutOfStock => "Out of Stock",
            StockBadge::LowStock => "Low Stock",
            StockBadge::InStock => "In Stock",
        }
    }
}

/// Settings for the outbound "enquire" link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTemplate {
    /// International number without `+`, as wa.me expects
    pub phone: String,
    pub business_name: String,
}

impl Default for ContactTemplate {
    fn default() -> Self {
        Self {
            phone: "919876543210".to_string(),
            business_name: "Modern Ply Gallery".to_string(),
        }
    }
}

impl ContactTemplate {
    /// Pre-filled inquiry message for one card
    pub fn message(&self, card: &ProductCard) -> String {
        let price = if card.price != 0.0 {
            format!("₹{}", format_inr(card.price))
        } else {
            "Please contact for price".to_string()
        };
        let stock = if card.stock != 0 {
            format!("{} units available", card.stock)
        } else {
            "Please check availability".to_string()
        };
        let restocked = card
            .last_order
            .as_ref()
            .map(|date| format!("📅 *Last Restocked:* {}", date))
            .unwrap_or_default();

        format!(
            "🛠️ *Product Inquiry - {}*\n\n\
             📦 *Product:* {}\n\
             🔢 *Part Number:* {}\n\
             💰 *Price:* {}\n\
             📊 *Stock:* {}\n\
             📋 *Status:* {}\n\
             {}\n\n\
             Could you please provide more details and confirm availability?\n\n\
             Thank you! 🙏",
            self.business_name,
            card.name,
            card.part_number,
            price,
            stock,
            card.badge.label(),
            restocked,
        )
    }

    pub fn url(&self, message: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.phone,
            encode_uri_component(message)
        )
    }
}

/// Display card for a single record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub name: String,
    pub part_number: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub status: String,
    pub badge: StockBadge,
    pub price: f64,
    pub price_label: String,
    pub stock: i64,
    pub stock_label: String,
    pub last_order: Option<String>,
    pub contact_url: String,
}

impl ProductCard {
    pub fn from_record(product: &ProductRecord, contact: &ContactTemplate) -> Self {
        let price = product.price();
        let stock = product.stock();
        let image_url = product
            .image_url()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty() && url != "N/A");

        let mut card = ProductCard {
            name: product
                .name()
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| "Unknown Product".to_string()),
            part_number: product.part_number().unwrap_or_else(|| "N/A".to_string()),
            image_url,
            category: product.category(),
            status: product.status_label().unwrap_or_else(|| "Unknown".to_string()),
            badge: StockBadge::classify(product),
            price,
            price_label: price_label(price),
            stock,
            stock_label: format!("{} in stock", stock),
            last_order: product
                .last_order_date()
                .and_then(|raw| format_date_en_in(&raw)),
            contact_url: String::new(),
        };
        card.contact_url = contact.url(&contact.message(&card));
        card
    }
}

/// Everything the presentation layer needs for one filter/sort pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultsView {
    pub visible: usize,
    pub total: usize,
    pub cards: Vec<ProductCard>,
}

impl ResultsView {
    pub fn results_count(&self) -> String {
        format!("Showing {} of {} products", self.visible, self.total)
    }

    /// True when the no-results indicator should be shown
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Project the filtered sequence into cards
pub fn render(filtered: &[&ProductRecord], total: usize, contact: &ContactTemplate) -> ResultsView {
    ResultsView {
        visible: filtered.len(),
        total,
        cards: filtered
            .iter()
            .map(|product| ProductCard::from_record(product, contact))
            .collect(),
    }
}

pub fn price_label(price: f64) -> String {
    if price != 0.0 {
        format!("₹{}", format_inr(price))
    } else {
        "Contact for Price".to_string()
    }
}

/// Format a number with Indian digit grouping (`12,34,567.5`), at most three decimals
pub fn format_inr(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_indian(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut rest, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while rest.len() > 2 {
        let (head, group) = rest.split_at(rest.len() - 2);
        groups.push(group);
        rest = head;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Render a sheet date as `d/m/yyyy`; `None` when it cannot be parsed
pub fn format_date_en_in(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = OffsetDateTime::parse(raw, &Rfc3339)
        .map(|dt| dt.to_offset(UtcOffset::UTC).date())
        .or_else(|_| Date::parse(raw, format_description!("[year]-[month]-[day]")))
        .or_else(|_| {
            let prefix = raw.get(..10).unwrap_or(raw);
            Date::parse(prefix, format_description!("[year]-[month]-[day]"))
        })
        .ok()?;
    Some(format!(
        "{}/{}/{}",
        date.day(),
        u8::from(date.month()),
        date.year()
    ))
}

// Everything `encodeURIComponent` leaves as-is
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode UTF-8 bytes outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    fn card(product: ProductRecord) -> ProductCard {
        ProductCard::from_record(&product, &ContactTemplate::default())
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0.5), "0.5");
        assert_eq!(format_inr(950.0), "950");
        assert_eq!(format_inr(2450.5), "2,450.5");
        assert_eq!(format_inr(1234567.0), "12,34,567");
        assert_eq!(format_inr(100000.125), "1,00,000.125");
        assert_eq!(format_inr(-12345.0), "-12,345");
    }

    #[test]
    fn test_price_label_fallback() {
        assert_eq!(price_label(0.0), "Contact for Price");
        assert_eq!(price_label(1800.0), "₹1,800");
    }

    #[test]
    fn test_badges() {
        let base = || ProductRecord::default().with(Field::StockStatus, "In Stock");
        assert_eq!(
            StockBadge::classify(&base().with(Field::CurrentStock, "10")),
            StockBadge::LowStock
        );
        assert_eq!(
            StockBadge::classify(&base().with(Field::CurrentStock, "11")),
            StockBadge::InStock
        );
        assert_eq!(
            StockBadge::classify(&base().with(Field::CurrentStock, "0")),
            StockBadge::InStock
        );
        assert_eq!(
            StockBadge::classify(&ProductRecord::default().with(Field::CurrentStock, "3")),
            StockBadge::OutOfStock
        );
    }

    #[test]
    fn test_card_defaults_for_malformed_record() {
        let card = card(
            ProductRecord::default()
                .with(Field::PricePerUnit, "bad")
                .with(Field::ImageUrl, "N/A"),
        );
        assert_eq!(card.name, "Unknown Product");
        assert_eq!(card.part_number, "N/A");
        assert_eq!(card.status, "Unknown");
        assert_eq!(card.price_label, "Contact for Price");
        assert_eq!(card.stock_label, "0 in stock");
        assert_eq!(card.image_url, None);
        assert_eq!(card.last_order, None);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            format_date_en_in("2024-03-05T00:00:00.000Z").as_deref(),
            Some("5/3/2024")
        );
        assert_eq!(format_date_en_in("2023-12-25").as_deref(), Some("25/12/2023"));
        assert_eq!(
            format_date_en_in("2023-12-25 10:30:00").as_deref(),
            Some("25/12/2023")
        );
        assert_eq!(format_date_en_in("yesterday"), None);
        assert_eq!(format_date_en_in(""), None);
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("a b&c"), "a%20b%26c");
        assert_eq!(encode_uri_component("*x*\n"), "*x*%0A");
        assert_eq!(encode_uri_component("₹"), "%E2%82%B9");
        assert_eq!(encode_uri_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_uri_component("a/b?c=d#e"), "a%2Fb%3Fc%3Dd%23e");
    }

    #[test]
    fn test_contact_message() {
        let card = card(
            ProductRecord::default()
                .with(Field::Name, " Marine Ply ")
                .with(Field::PartNumber, "MP-18")
                .with(Field::PricePerUnit, "2450.5")
                .with(Field::CurrentStock, "4")
                .with(Field::StockStatus, "In Stock")
                .with(Field::LastOrderDate, "2024-03-05"),
        );
        let message = ContactTemplate::default().message(&card);
        assert!(message.starts_with("🛠️ *Product Inquiry - Modern Ply Gallery*\n\n"));
        assert!(message.contains("📦 *Product:* Marine Ply\n"));
        assert!(message.contains("💰 *Price:* ₹2,450.5\n"));
        assert!(message.contains("📊 *Stock:* 4 units available\n"));
        assert!(message.contains("📋 *Status:* Low Stock\n"));
        assert!(message.contains("📅 *Last Restocked:* 5/3/2024\n\n"));
        assert!(card.contact_url.starts_with("https://wa.me/919876543210?text="));
        assert!(!card.contact_url.contains(' '));
    }

    #[test]
    fn test_contact_message_without_price_or_stock() {
        let card = card(ProductRecord::default().with(Field::Name, "Hinge"));
        let message = ContactTemplate::default().message(&card);
        assert!(message.contains("💰 *Price:* Please contact for price\n"));
        assert!(message.contains("📊 *Stock:* Please check availability\n"));
        assert!(message.contains("📋 *Status:* Out of Stock\n\n\n"));
    }

    #[test]
    fn test_render_view() {
        let all = vec![
            ProductRecord::default().with(Field::Name, "A"),
            ProductRecord::default().with(Field::Name, "B"),
        ];
        let refs: Vec<&ProductRecord> = all.iter().take(1).collect();
        let view = render(&refs, all.len(), &ContactTemplate::default());
        assert_eq!(view.results_count(), "Showing 1 of 2 products");
        assert!(!view.is_empty());

        let view = render(&[], all.len(), &ContactTemplate::default());
        assert_eq!(view.results_count(), "Showing 0 of 2 products");
        assert!(view.is_empty());
    }
}
