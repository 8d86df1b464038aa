const HOST: &str = "https://en.aruodas.lt";
const SORT_QUERY: &str = "FOrder=AddDate";

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Listing {
    pub region: Option<String>,
    pub street: Option<String>,
    pub price: Option<String>,
    pub rooms: String,
    pub size: String,
    pub floors: String,
    pub url: String,
}

/// Which listing section of the portal to scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Rent,
    Buy,
}

impl ListingKind {
    fn section_path(self) -> &'static str {
        match self {
            ListingKind::Rent => "butu-nuoma/vilniuje",
            ListingKind::Buy => "butai/vilniuje",
        }
    }

    pub fn first_page_url(self) -> String {
        format!("{}/{}/?{}", HOST, self.section_path(), SORT_QUERY)
    }

    /// URL of page `page` (1-based) in the paginated results.
    pub fn page_url(self, page: u32) -> String {
        format!(
            "{}/{}/puslapis/{}/?{}",
            HOST,
            self.section_path(),
            page,
            SORT_QUERY
        )
    }

    pub fn file_prefix(self) -> &'static str {
        match self {
            ListingKind::Rent => "Vilnius_RENT",
            ListingKind::Buy => "Vilnius_BUY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_urls() {
        assert_eq!(
            ListingKind::Rent.first_page_url(),
            "https://en.aruodas.lt/butu-nuoma/vilniuje/?FOrder=AddDate"
        );
        assert_eq!(
            ListingKind::Buy.first_page_url(),
            "https://en.aruodas.lt/butai/vilniuje/?FOrder=AddDate"
        );
    }

    #[test]
    fn test_page_url_substitutes_index() {
        assert_eq!(
            ListingKind::Rent.page_url(7),
            "https://en.aruodas.lt/butu-nuoma/vilniuje/puslapis/7/?FOrder=AddDate"
        );
        assert_eq!(
            ListingKind::Buy.page_url(2),
            "https://en.aruodas.lt/butai/vilniuje/puslapis/2/?FOrder=AddDate"
        );
    }

    #[test]
    fn test_file_prefixes() {
        assert_eq!(ListingKind::Rent.file_prefix(), "Vilnius_RENT");
        assert_eq!(ListingKind::Buy.file_prefix(), "Vilnius_BUY");
    }
}
