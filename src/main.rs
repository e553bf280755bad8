//! brickdeal - LEGO resale profitability analyzer
//!
//! Scrapes Dealabs deals and Vinted listings, then scores resale potential.

use anyhow::Result;
use brickdeal::commands::{deals, AnalyzeCommand, DealsCommand, HistoryCommand};
use brickdeal::config::{Config, OutputFormat};
use brickdeal::store::DealSort;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "brickdeal",
    version,
    about = "LEGO resale profitability analyzer",
    long_about = "Scores Dealabs LEGO deals against Vinted resale listings and recommends whether a deal is worth flipping."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "BRICKDEAL_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, default_value = "2000", global = true, env = "BRICKDEAL_DELAY")]
    delay: u64,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for scraped data and analysis history
    #[arg(long, global = true, env = "BRICKDEAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a deal URL, set number, or search query
    #[command(alias = "a")]
    Analyze {
        /// Dealabs thread URL, LEGO set number, or search query
        input: String,

        /// Maximum marketplace listings to keep
        #[arg(long, default_value = "96")]
        max_listings: usize,
    },

    /// List the latest analysis per set
    #[command(alias = "d")]
    Deals {
        /// Sort order: price, score, comments
        #[arg(short, long, default_value = "price")]
        sort: DealSort,

        /// Maximum number of analyses shown
        #[arg(short, long, default_value_t = deals::DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Show the full analysis history for a set
    #[command(alias = "h")]
    History {
        /// LEGO set number
        set: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;
    config.delay_ms = cli.delay;

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }

    match cli.command {
        Commands::Analyze { input, max_listings } => {
            config.max_listings = max_listings;

            let cmd = AnalyzeCommand::new(config);
            let output = cmd.execute(&input).await?;
            println!("{}", output);
        }

        Commands::Deals { sort, limit } => {
            let cmd = DealsCommand::new(config);
            let output = cmd.execute(sort, limit)?;
            println!("{}", output);
        }

        Commands::History { set } => {
            let cmd = HistoryCommand::new(config);
            let output = cmd.execute(&set)?;
            println!("{}", output);
        }
    }

    Ok(())
}
