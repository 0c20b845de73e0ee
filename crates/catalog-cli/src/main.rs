mod cli;
mod commands;

use anyhow::Result;
use catalog_config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Keep log lines off the alternate screen while browsing
    let default_level = match cli.command {
        cli::Commands::Browse => "warn",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let cli::Commands::Completions { shell } = cli.command {
        return commands::completions::handle(shell);
    }

    let mut config = Config::load()?;
    cli.api.apply(&mut config);
    config.validate()?;

    match cli.command {
        cli::Commands::Browse => commands::browse::handle(&config).await,
        cli::Commands::List {
            search,
            filter,
            sort,
            format,
        } => commands::list::handle(&config, search, filter, sort, format).await,
        cli::Commands::Stats { format } => commands::stats::handle(&config, format).await,
        cli::Commands::Serve { host, port } => commands::serve::handle(&config, host, port).await,
        cli::Commands::Config => commands::config::handle(&config),
        cli::Commands::Completions { .. } => Ok(()),
    }
}
