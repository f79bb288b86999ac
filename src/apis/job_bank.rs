use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::get_checked;
use crate::app::ports::HttpClientPort;
use crate::error::{PipelineError, Result};

const SOURCE: &str = "job_bank";
const CELLS_PER_ROW: usize = 5;

/// The five cells of one wage report row, as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOccupationRow {
    pub occupation: String,
    pub low_wage: String,
    pub median_wage: String,
    pub high_wage: String,
    pub source: Option<String>,
}

pub struct JobBankScraper {
    http: Arc<dyn HttpClientPort>,
    url: String,
}

impl JobBankScraper {
    pub fn new(http: Arc<dyn HttpClientPort>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_rows(&self) -> Result<Vec<RawOccupationRow>> {
        let resp = get_checked(self.http.as_ref(), SOURCE, &self.url).await?;
        let body = String::from_utf8_lossy(&resp.bytes);
        let rows = parse_wage_table(&body)?;
        info!("Parsed {} occupation rows from the wage report", rows.len());
        if rows.is_empty() {
            warn!("No occupation rows found - the page structure may have changed");
        }
        Ok(rows)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PipelineError::Parse(format!("selector '{}': {}", css, e)))
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Extract every row of the first table body in `html`.
///
/// A document with no `tbody` is a parse error. Rows with fewer than five
/// cells are skipped; a missing link in the last cell leaves the source absent.
pub fn parse_wage_table(html: &str) -> Result<Vec<RawOccupationRow>> {
    let document = Html::parse_document(html);
    let tbody_selector = selector("tbody")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a[href]")?;

    let tbody = document
        .select(&tbody_selector)
        .next()
        .ok_or_else(|| PipelineError::Parse("wage report has no table body".into()))?;

    let mut rows = Vec::new();
    for (i, row) in tbody.select(&row_selector).enumerate() {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < CELLS_PER_ROW {
            warn!(row = i, cells = cells.len(), "Skipping wage report row with too few cells");
            continue;
        }

        let source = cells[4]
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        rows.push(RawOccupationRow {
            occupation: cell_text(&cells[0]),
            low_wage: cell_text(&cells[1]),
            median_wage: cell_text(&cells[2]),
            high_wage: cell_text(&cells[3]),
            source,
        });
    }
    Ok(rows)
}
