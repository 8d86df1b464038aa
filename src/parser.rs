use anyhow::{anyhow, Context, Result};
use scraper::{ElementRef, Html, Node, Selector};

use crate::listing::Listing;

/// Separator used both to join the address link's text nodes and to split them
/// back into region/street tokens.
const ADDRESS_SEPARATOR: &str = "-";

/// Outcome of classifying one results-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// A real listing, carrying the address tokens read from its title link.
    Listing { tokens: Vec<String> },
    /// A promotional row that has no titled address cell.
    Ad,
}

/// Extracts listings and pagination info from results pages
pub struct PageParser {
    table_body: Selector,
    row: Selector,
    address: Selector,
    heading: Selector,
    link: Selector,
    price: Selector,
    rooms: Selector,
    area: Selector,
    floors: Selector,
    pagination: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Failed to parse selector {}: {:?}", css, e))
}

impl PageParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table_body: selector("tbody")?,
            row: selector("tr.list-row")?,
            address: selector("td.list-adress")?,
            heading: selector("h3")?,
            link: selector("a")?,
            price: selector("div.price")?,
            rooms: selector("td.list-RoomNum")?,
            area: selector("td.list-AreaOverall")?,
            floors: selector("td.list-Floors")?,
            pagination: selector("div.pagination")?,
        })
    }

    /// Parse every listing row of a results page, in document order.
    /// Ad rows are skipped.
    pub fn parse_listings(&self, html: &str) -> Result<Vec<Listing>> {
        let document = Html::parse_document(html);
        self.listings_in(&document)
    }

    /// Total page count announced by the pagination control.
    pub fn page_count(&self, html: &str) -> Result<u32> {
        let document = Html::parse_document(html);
        self.page_count_in(&document)
    }

    /// Listings and page count of the first results page, parsing it once.
    pub fn parse_first_page(&self, html: &str) -> Result<(Vec<Listing>, u32)> {
        let document = Html::parse_document(html);
        let listings = self.listings_in(&document)?;
        let pages = self.page_count_in(&document)?;
        Ok((listings, pages))
    }

    fn listings_in(&self, document: &Html) -> Result<Vec<Listing>> {
        let body = document
            .select(&self.table_body)
            .next()
            .context("Results table body not found")?;

        let mut listings = Vec::new();
        for row in body.select(&self.row) {
            match self.classify_row(row) {
                RowKind::Listing { tokens } => listings.push(self.parse_row(row, &tokens)?),
                RowKind::Ad => log::trace!("Skipping ad row"),
            }
        }

        Ok(listings)
    }

    fn page_count_in(&self, document: &Html) -> Result<u32> {
        let pagination = document
            .select(&self.pagination)
            .next()
            .context("Pagination control not found")?;

        let links: Vec<ElementRef> = pagination.select(&self.link).collect();
        if links.len() < 2 {
            anyhow::bail!("Pagination control has {} links, expected at least 2", links.len());
        }

        // The last link is the "next" arrow, not a page number.
        let label: String = links[links.len() - 2].text().collect();
        label
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Pagination label {:?} is not a page number", label))
    }

    /// Decide whether `row` is a listing by looking for the `h3 > a` title
    /// link inside its address cell.
    pub fn classify_row(&self, row: ElementRef) -> RowKind {
        match self.title_link(row) {
            Some(link) => RowKind::Listing {
                tokens: address_tokens(link),
            },
            None => RowKind::Ad,
        }
    }

    /// Build a listing from a row already classified as one.
    pub fn parse_row(&self, row: ElementRef, tokens: &[String]) -> Result<Listing> {
        let (region, street) = split_address(tokens);

        let url = self
            .title_link(row)
            .and_then(|link| link.value().attr("href"))
            .context("Listing title link has no href")?
            .to_string();

        Ok(Listing {
            region,
            street,
            price: self.extract_price(row),
            rooms: self.cell_text(row, &self.rooms, "list-RoomNum")?,
            size: self.cell_text(row, &self.area, "list-AreaOverall")?,
            floors: self.cell_text(row, &self.floors, "list-Floors")?,
            url,
        })
    }

    /// Price of a row, read by position from the price block.
    ///
    /// The portal renders two shapes: five child nodes for a plain price and
    /// seven when a price-drop badge precedes it. Any other shape yields `None`.
    pub fn extract_price(&self, row: ElementRef) -> Option<String> {
        let block = row.select(&self.price).next()?;
        let children: Vec<_> = block.children().collect();

        let price_node = match children.len() {
            5 => children[1],
            7 => children[3],
            _ => return None,
        };

        let text = match price_node.value() {
            Node::Text(text) => text.to_string(),
            Node::Comment(comment) => comment.to_string(),
            Node::Element(_) => ElementRef::wrap(price_node)?.text().collect(),
            _ => String::new(),
        };

        Some(drop_last_chars(&text, 2).replace(' ', ""))
    }

    fn title_link<'a>(&self, row: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let cell = row.select(&self.address).next()?;
        let heading = cell.select(&self.heading).next()?;
        heading.select(&self.link).next()
    }

    fn cell_text(&self, row: ElementRef, cell: &Selector, class: &str) -> Result<String> {
        let element = row
            .select(cell)
            .next()
            .with_context(|| format!("Listing row has no {} cell", class))?;

        let text: String = element.text().collect();
        Ok(text.replace(['\n', ' '], ""))
    }
}

/// Visible text of the address link: text nodes trimmed, empty ones dropped,
/// joined and split again on the separator.
fn address_tokens(link: ElementRef) -> Vec<String> {
    let joined = link
        .text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(ADDRESS_SEPARATOR);

    joined.split(ADDRESS_SEPARATOR).map(str::to_string).collect()
}

/// First token is the region, second the street. Anything past the second
/// token is ignored; fewer than two tokens leaves both empty.
pub fn split_address(tokens: &[String]) -> (Option<String>, Option<String>) {
    match tokens {
        [region, street, ..] => (Some(region.clone()), Some(street.clone())),
        _ => (None, None),
    }
}

fn drop_last_chars(text: &str, count: usize) -> &str {
    match text.char_indices().rev().nth(count - 1) {
        Some((idx, _)) => &text[..idx],
        None => "",
    }
}
