use anyhow::Result;
use catalog_config::Config;

use crate::cli::OutputFormat;

pub async fn handle(config: &Config, format: OutputFormat) -> Result<()> {
    let pipeline = super::load_catalog(config).await?;
    let stats = pipeline.stats();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!("Catalog: {}", pipeline.options().contact.business_name);
            println!("  Products:     {}", stats.total);
            println!("  In stock:     {}", stats.in_stock);
            println!("  Out of stock: {}", stats.out_of_stock);
            println!("  Low stock:    {}", stats.low_stock);
            println!("  Categories:   {}", stats.categories_label());
        }
    }

    Ok(())
}
