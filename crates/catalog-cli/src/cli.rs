use catalog_config::Config;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Browse the product catalog from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Per-invocation overrides for the `[api]` config section
#[derive(Args)]
pub struct ApiArgs {
    /// Catalog endpoint URL
    #[arg(long, global = true, env = "CATALOG_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Request deadline in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl ApiArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_secs = timeout;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive catalog browser
    Browse,

    /// Print the filtered, sorted catalog
    List {
        /// Case-insensitive match on name or part number
        #[arg(long, short)]
        search: Option<String>,

        /// all, in-stock, out-of-stock or low-stock
        #[arg(long, short, default_value = "all")]
        filter: String,

        /// name, price-low, price-high or stock
        #[arg(long, default_value = "name")]
        sort: String,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print catalog counters
    Stats {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Run the offline caching proxy in front of the site
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Show config file path and effective settings
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::try_parse_from(["catalog", "list"]).unwrap();
        match cli.command {
            Commands::List {
                search,
                filter,
                sort,
                format,
            } => {
                assert!(search.is_none());
                assert_eq!(filter, "all");
                assert_eq!(sort, "name");
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_global_overrides_apply() {
        let cli = Cli::try_parse_from([
            "catalog",
            "stats",
            "--endpoint",
            "http://localhost:9000/exec",
            "--timeout",
            "3",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.api.apply(&mut config);
        assert_eq!(config.api.endpoint, "http://localhost:9000/exec");
        assert_eq!(config.api.timeout_secs, 3);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["catalog", "list", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        let cli = Cli::try_parse_from(["catalog", "stats", "--endpoint", "  "]).unwrap();
        let mut config = Config::default();
        cli.api.apply(&mut config);
        assert!(config.validate().is_err());
    }
}
