use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::listing::{Listing, ListingKind};

/// Header of the data columns. The leading index column has an empty name.
pub const COLUMNS: [&str; 7] = [
    "Region",
    "Street",
    "Rent_Price",
    "No_Of_Rooms",
    "Size",
    "No_Of_Floors",
    "URL",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H_%M";

/// Where the export landed and how many rows it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Drop exact duplicates, keeping the first occurrence.
///
/// Each kept listing is paired with its position in the input, which becomes
/// the row index in the CSV output.
pub fn dedup(listings: Vec<Listing>) -> Vec<(usize, Listing)> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .enumerate()
        .filter(|(_, listing)| seen.insert(listing.clone()))
        .collect()
}

pub fn export_file_name(kind: ListingKind, timestamp: NaiveDateTime) -> String {
    format!("{}_{}.csv", kind.file_prefix(), timestamp.format(TIMESTAMP_FORMAT))
}

/// Serialize indexed rows as CSV with a header line.
pub fn write_csv<W: Write>(writer: W, rows: &[(usize, Listing)]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut header = vec![""];
    header.extend(COLUMNS);
    csv_writer.write_record(&header)?;

    for (index, listing) in rows {
        let index = index.to_string();
        csv_writer.write_record([
            index.as_str(),
            listing.region.as_deref().unwrap_or(""),
            listing.street.as_deref().unwrap_or(""),
            listing.price.as_deref().unwrap_or(""),
            listing.rooms.as_str(),
            listing.size.as_str(),
            listing.floors.as_str(),
            listing.url.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Deduplicate `listings` and write them to a timestamped file in `dir`.
pub fn export(
    kind: ListingKind,
    listings: Vec<Listing>,
    dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<ExportSummary> {
    let scraped = listings.len();
    let rows = dedup(listings);
    log::debug!("Removed {} duplicate rows", scraped - rows.len());

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(export_file_name(kind, timestamp));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, &rows).with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Saved {} rows to {}", rows.len(), path.display());

    Ok(ExportSummary {
        path,
        rows: rows.len(),
    })
}
