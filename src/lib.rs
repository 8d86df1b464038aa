// Vilnius Listing Scraper Library
//
// Walks the paginated rental and sale results of en.aruodas.lt for Vilnius,
// parses every listing row and exports the deduplicated set as CSV.

pub mod config;
pub mod export;
pub mod fetcher;
pub mod listing;
pub mod pager;
pub mod parser;
pub mod runner;

// Re-export main types for convenience
pub use config::ScraperConfig;
pub use export::ExportSummary;
pub use fetcher::{Fetcher, HttpFetcher, UserAgent};
pub use listing::{Listing, ListingKind};
pub use pager::Pager;
pub use parser::{PageParser, RowKind};
pub use runner::{scrape_rentals, scrape_sales};
