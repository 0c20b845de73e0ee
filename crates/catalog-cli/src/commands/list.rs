use anyhow::Result;
use catalog_config::Config;
use catalog_core::{ProductCard, ResultsView};

use crate::cli::OutputFormat;

pub async fn handle(
    config: &Config,
    search: Option<String>,
    filter: String,
    sort: String,
    format: OutputFormat,
) -> Result<()> {
    let mut pipeline = super::load_catalog(config).await?;

    pipeline.on_filter_changed(&filter)?;
    pipeline.on_sort_changed(&sort)?;
    let view = pipeline.on_search_changed(search.unwrap_or_default());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
        OutputFormat::Text => print_text(view),
    }

    Ok(())
}

fn print_text(view: &ResultsView) {
    println!("{}", view.results_count());

    if view.is_empty() {
        println!("\nNo products found.");
        return;
    }

    println!();
    for card in &view.cards {
        print_card(card);
    }
}

fn print_card(card: &ProductCard) {
    println!("  [{}] {} ({})", card.badge.label(), card.name, card.part_number);
    println!("    {} | {}", card.price_label, card.stock_label);
    if let Some(category) = &card.category {
        println!("    Category: {}", category);
    }
    if let Some(date) = &card.last_order {
        println!("    Last order: {}", date);
    }
    println!("    Enquire: {}", card.contact_url);
}
