use anyhow::Result;
use chrono::{Local, NaiveDateTime};

use crate::config::ScraperConfig;
use crate::export::{self, ExportSummary};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::listing::ListingKind;
use crate::pager::Pager;

/// Scrape every Vilnius rental listing and save them as `Vilnius_RENT_*.csv`.
pub async fn scrape_rentals(config: &ScraperConfig) -> Result<ExportSummary> {
    scrape_live(ListingKind::Rent, config).await
}

/// Scrape every Vilnius flat-for-sale listing and save them as `Vilnius_BUY_*.csv`.
pub async fn scrape_sales(config: &ScraperConfig) -> Result<ExportSummary> {
    scrape_live(ListingKind::Buy, config).await
}

async fn scrape_live(kind: ListingKind, config: &ScraperConfig) -> Result<ExportSummary> {
    let fetcher = HttpFetcher::new(config.user_agent())?;
    run(kind, fetcher, config, Local::now().naive_local()).await
}

/// Walk all pages with `fetcher`, then export under the `started` timestamp.
pub async fn run<F: Fetcher>(
    kind: ListingKind,
    fetcher: F,
    config: &ScraperConfig,
    started: NaiveDateTime,
) -> Result<ExportSummary> {
    let pager = Pager::new(fetcher)?;
    let listings = pager.scrape(kind).await?;

    let summary = export::export(kind, listings, &config.output_dir, started)?;
    println!("\n done {} entries found", summary.rows);

    Ok(summary)
}
