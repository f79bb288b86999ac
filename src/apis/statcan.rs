use serde::Deserialize;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{info, instrument};
use zip::result::ZipError;
use zip::ZipArchive;

use super::get_checked;
use crate::app::ports::HttpClientPort;
use crate::error::{PipelineError, Result};
use crate::table::Table;

const SOURCE: &str = "statcan";

/// Response of `getFullTableDownloadCSV`: a status and the archive URL.
#[derive(Debug, Deserialize)]
struct DownloadLink {
    status: String,
    object: Option<String>,
}

/// Retrieves full statistics tables from the Statistics Canada Web Data
/// Service as zipped CSV.
pub struct StatCanTableFetcher {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
}

impl StatCanTableFetcher {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn download_link_url(&self, table_id: &str) -> String {
        format!(
            "{}/getFullTableDownloadCSV/{}/en",
            self.base_url.trim_end_matches('/'),
            table_id
        )
    }

    #[instrument(skip(self))]
    pub async fn fetch_table(&self, table_id: &str) -> Result<Table> {
        let link_url = self.download_link_url(table_id);
        let resp = get_checked(self.http.as_ref(), SOURCE, &link_url).await?;
        let link: DownloadLink = serde_json::from_slice(&resp.bytes)?;

        if link.status != "SUCCESS" {
            return Err(PipelineError::Api {
                message: format!("table {} download request returned {}", table_id, link.status),
            });
        }
        let archive_url = link.object.ok_or_else(|| PipelineError::Api {
            message: format!("table {} download response has no archive URL", table_id),
        })?;

        info!("Downloading table {} from {}", table_id, archive_url);
        let archive = get_checked(self.http.as_ref(), SOURCE, &archive_url).await?;
        let table = read_table_from_zip(&archive.bytes, table_id)?;
        info!(
            rows = table.len(),
            columns = table.columns().len(),
            "Fetched table {}",
            table_id
        );
        Ok(table)
    }
}

/// Read `<table_id>.csv` out of a table archive. The metadata CSV that ships
/// alongside it is ignored.
pub fn read_table_from_zip(bytes: &[u8], table_id: &str) -> Result<Table> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let entry_name = format!("{}.csv", table_id);
    let entry = match archive.by_name(&entry_name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(PipelineError::Api {
                message: format!("archive for table {} has no {}", table_id, entry_name),
            })
        }
        Err(e) => return Err(e.into()),
    };
    Table::from_csv_reader(entry)
}
