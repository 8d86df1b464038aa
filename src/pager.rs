use anyhow::{Context, Result};

use crate::fetcher::Fetcher;
use crate::listing::{Listing, ListingKind};
use crate::parser::PageParser;

/// Pages fetched past the count read from the pagination control.
// TODO: confirm against the live portal whether this extra page is ever non-empty.
pub const EXTRA_PAGES: u32 = 1;

/// Walks every results page of one listing kind, one request at a time.
pub struct Pager<F> {
    fetcher: F,
    parser: PageParser,
}

impl<F: Fetcher> Pager<F> {
    pub fn new(fetcher: F) -> Result<Self> {
        Ok(Self {
            fetcher,
            parser: PageParser::new()?,
        })
    }

    /// Fetch and parse all pages for `kind`, in page order.
    ///
    /// Any fetch or page-level parse failure aborts the walk.
    pub async fn scrape(&self, kind: ListingKind) -> Result<Vec<Listing>> {
        let first_url = kind.first_page_url();
        log::info!("Starting {:?} scrape from: {}", kind, first_url);

        let html = self
            .fetcher
            .fetch(&first_url)
            .await
            .with_context(|| format!("Failed to fetch page 1: {}", first_url))?;
        let (mut listings, detected) = self
            .parser
            .parse_first_page(&html)
            .context("Failed to parse page 1")?;
        report_page(1, listings.len(), listings.len());

        let last_page = detected
            .checked_add(EXTRA_PAGES)
            .context("Pagination count out of range")?;
        log::debug!("Pagination reports {} pages, walking to page {}", detected, last_page);

        for page in 2..=last_page {
            let url = kind.page_url(page);
            let html = self
                .fetcher
                .fetch(&url)
                .await
                .with_context(|| format!("Failed to fetch page {}: {}", page, url))?;
            let found = self
                .parser
                .parse_listings(&html)
                .with_context(|| format!("Failed to parse page {}", page))?;

            let count = found.len();
            listings.extend(found);
            report_page(page, count, listings.len());
        }

        Ok(listings)
    }
}

fn report_page(page: u32, found: usize, total: usize) {
    println!("page {} found {} entries. Total data {}", page, found, total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages and records every URL requested.
    struct FakeFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(pages: Vec<(String, String)>) -> Self {
            Self {
                pages: pages.into_iter().collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(html) => Ok(html.clone()),
                None => anyhow::bail!("HTTP error: 404 Not Found"),
            }
        }
    }

    fn row(address: &str, href: &str) -> String {
        format!(
            "<tr class=\"list-row\"><td class=\"list-adress\"><h3><a href=\"{}\">{}</a></h3></td>\
             <td class=\"list-RoomNum\">2</td><td class=\"list-AreaOverall\">50</td>\
             <td class=\"list-Floors\">1/5</td>\
             <td><div class=\"price\">\n<span>500 €</span>\n<span>10 €/m²</span>\n</div></td></tr>",
            href, address
        )
    }

    fn page(rows: &[String], last_page: u32) -> String {
        format!(
            "<html><body><table><tbody>{}</tbody></table>\
             <div class=\"pagination\"><a href=\"#\">1</a><a href=\"#\">{}</a><a href=\"#\">»</a></div>\
             </body></html>",
            rows.join(""),
            last_page
        )
    }

    #[tokio::test]
    async fn test_extra_page_is_fetched_and_concatenated() {
        let kind = ListingKind::Buy;
        let ad = "<tr class=\"list-row\"><td>Promo</td></tr>".to_string();
        let fetcher = FakeFetcher::new(vec![
            (kind.first_page_url(), page(&[row("A-B", "/1"), ad, row("C-D", "/2")], 1)),
            (kind.page_url(2), page(&[row("E-F", "/3")], 1)),
        ]);

        let pager = Pager::new(fetcher).unwrap();
        let listings = pager.scrape(kind).await.unwrap();

        let urls: Vec<&str> = listings.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["/1", "/2", "/3"]);
        assert_eq!(
            *pager.fetcher.requested.lock().unwrap(),
            vec![kind.first_page_url(), kind.page_url(2)]
        );
    }

    #[tokio::test]
    async fn test_pages_are_walked_in_order() {
        let kind = ListingKind::Rent;
        let fetcher = FakeFetcher::new(vec![
            (kind.first_page_url(), page(&[row("A-B", "/1")], 3)),
            (kind.page_url(2), page(&[row("A-B", "/2")], 3)),
            (kind.page_url(3), page(&[row("A-B", "/3")], 3)),
            (kind.page_url(4), page(&[], 3)),
        ]);

        let pager = Pager::new(fetcher).unwrap();
        let listings = pager.scrape(kind).await.unwrap();

        assert_eq!(listings.len(), 3);
        assert_eq!(pager.fetcher.requested.lock().unwrap().len(), 4);
        assert_eq!(
            pager.fetcher.requested.lock().unwrap().last().unwrap(),
            &kind.page_url(4)
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_aborts_the_run() {
        let kind = ListingKind::Rent;
        let fetcher = FakeFetcher::new(vec![
            (kind.first_page_url(), page(&[row("A-B", "/1")], 3)),
            (kind.page_url(2), page(&[row("A-B", "/2")], 3)),
        ]);

        let pager = Pager::new(fetcher).unwrap();
        let err = pager.scrape(kind).await.unwrap_err();

        assert!(format!("{:#}", err).contains("page 3"));
        // Nothing is requested after the failure.
        assert_eq!(pager.fetcher.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_page_count_overflow_is_an_error() {
        let kind = ListingKind::Rent;
        let fetcher = FakeFetcher::new(vec![(kind.first_page_url(), page(&[row("A-B", "/1")], u32::MAX))]);

        let pager = Pager::new(fetcher).unwrap();
        let err = pager.scrape(kind).await.unwrap_err();

        assert!(format!("{:#}", err).contains("out of range"));
        assert_eq!(pager.fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_pagination_is_fatal() {
        let kind = ListingKind::Buy;
        let html = format!(
            "<html><body><table><tbody>{}</tbody></table></body></html>",
            row("A-B", "/1")
        );
        let fetcher = FakeFetcher::new(vec![(kind.first_page_url(), html)]);

        let pager = Pager::new(fetcher).unwrap();
        assert!(pager.scrape(kind).await.is_err());
    }
}
