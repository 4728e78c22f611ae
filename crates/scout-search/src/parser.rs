use crate::error::{Result, SearchError};
use scraper::{ElementRef, Html, Selector};
use scout_core::ResultRecord;

/// Cells a data row must have to be read as a record.
const RECORD_CELLS: usize = 6;

/// Extracts directory rows from rendered result pages.
pub struct ResultParser {
    rows: Selector,
    cells: Selector,
    link: Selector,
}

impl ResultParser {
    pub fn new(row_selector: &str) -> Result<Self> {
        Ok(Self {
            rows: parse_selector(row_selector)?,
            cells: parse_selector("td")?,
            link: parse_selector("a")?,
        })
    }

    /// Records on one page, in row order.
    ///
    /// Rows with fewer than six cells (headers, "no data" placeholders) are
    /// skipped. A page without the results table yields no records.
    pub fn parse(&self, html: &str) -> Vec<ResultRecord> {
        let document = Html::parse_document(html);
        document
            .select(&self.rows)
            .filter_map(|row| self.parse_row(&row))
            .collect()
    }

    fn parse_row(&self, row: &ElementRef) -> Option<ResultRecord> {
        let cells: Vec<ElementRef> = row.select(&self.cells).collect();
        if cells.len() < RECORD_CELLS {
            return None;
        }

        let website_url = cells[5]
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .unwrap_or_default();

        Some(ResultRecord {
            action: cell_text(&cells[0]),
            location: cell_text(&cells[1]),
            name: cell_text(&cells[2]),
            organization: cell_text(&cells[3]),
            phone: cell_text(&cells[4]),
            website_url,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| SearchError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Visible text of a cell with runs of whitespace collapsed.
fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
