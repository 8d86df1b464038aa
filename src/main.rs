use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use aruodas_scraper::{scrape_rentals, scrape_sales, ScraperConfig};

#[derive(Debug, Parser)]
#[command(name = "aruodas-scraper", version, about = "Export Vilnius flat listings to CSV")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory to write the CSV file to (overrides the config file)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scrape flats for rent
    Rent,
    /// Scrape flats for sale
    Buy,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_level));

    let mut config = ScraperConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    match cli.command {
        Command::Rent => scrape_rentals(&config).await?,
        Command::Buy => scrape_sales(&config).await?,
    };

    Ok(())
}
