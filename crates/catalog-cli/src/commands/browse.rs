use anyhow::Result;
use catalog_config::Config;

pub async fn handle(config: &Config) -> Result<()> {
    let pipeline = super::build_pipeline(config)?;
    catalog_tui::run(pipeline).await
}
