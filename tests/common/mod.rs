#![allow(dead_code)]

use alberta_wages::app::ports::{HttpClientPort, HttpGetResult};
use alberta_wages::config::Config;
use alberta_wages::constants::*;
use alberta_wages::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

pub const BASE_URL: &str = "https://stats.test/rest";
pub const JOBS_URL: &str = "https://jobs.test/wagereport/location/ab";

/// Serves canned bodies by URL; anything else is a 404.
#[derive(Default)]
pub struct FakeHttp {
    responses: HashMap<String, (u16, Vec<u8>)>,
}

impl FakeHttp {
    pub fn with(mut self, url: &str, status: u16, body: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), (status, body));
        self
    }

    pub fn with_table(self, table_id: &str, csv: &str) -> Self {
        let archive_url = format!("https://stats.test/{}-eng.zip", table_id);
        let link = format!(r#"{{"status":"SUCCESS","object":"{}"}}"#, archive_url);
        self.with(
            &format!("{}/getFullTableDownloadCSV/{}/en", BASE_URL, table_id),
            200,
            link.into_bytes(),
        )
        .with(&archive_url, 200, zip_table(table_id, csv))
    }
}

#[async_trait]
impl HttpClientPort for FakeHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let (status, bytes) = self
            .responses
            .get(url)
            .cloned()
            .unwrap_or((404, b"not found".to_vec()));
        Ok(HttpGetResult {
            status,
            bytes,
            content_type: "application/octet-stream".into(),
        })
    }
}

pub fn zip_table(table_id: &str, csv: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file(format!("{}_MetaData.csv", table_id), options).unwrap();
        zip.write_all(b"\"Cube Title\"\n\"Employee wages\"\n").unwrap();
        zip.start_file(format!("{}.csv", table_id), options).unwrap();
        zip.write_all(csv.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf
}

fn to_csv(header: &[&str], rows: &[Vec<&str>]) -> String {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(header).unwrap();
    for row in rows {
        wtr.write_record(row).unwrap();
    }
    let mut text = String::from("\u{feff}");
    text.push_str(&String::from_utf8(wtr.into_inner().unwrap()).unwrap());
    text
}

const WAGE_HEADER: [&str; 19] = [
    "REF_DATE", "GEO", "DGUID", "Wages", "Type of work", COL_NAICS, "Sex", "Age group", "UOM",
    "UOM_ID", "SCALAR_FACTOR", "SCALAR_ID", "VECTOR", "COORDINATE", "VALUE", "STATUS", "SYMBOL",
    "TERMINATED", "DECIMALS",
];

const HOURS_HEADER: [&str; 17] = [
    "REF_DATE", "GEO", "DGUID", "Actual hours worked", COL_NAICS, "Sex", "UOM", "UOM_ID",
    "SCALAR_FACTOR", "SCALAR_ID", "VECTOR", "COORDINATE", "VALUE", "STATUS", "SYMBOL",
    "TERMINATED", "DECIMALS",
];

fn wage<'a>(date: &'a str, geo: &'a str, measure: &'a str, sector: &'a str, uom: &'a str, value: &'a str) -> Vec<&'a str> {
    vec![
        date, geo, "2016A000248", measure, WORK_TYPE, sector, "Both sexes", "15 years and over",
        uom, "81", "units", "0", "v1", "1.1.1", value, "", "", "", "2",
    ]
}

fn hours<'a>(date: &'a str, measure: &'a str, sector: &'a str, uom: &'a str, value: &'a str) -> Vec<&'a str> {
    vec![
        date, "Alberta", "2016A000248", measure, sector, "Both sexes", uom, "120", "units", "0",
        "v2", "1.1.1", value, "", "", "", "1",
    ]
}

pub const WHOLESALE: &str = "Wholesale and retail trade [41, 44-45]";
pub const WHOLESALE_TABBED: &str = "Wholesale and retail trade\t\t [41, 44-45]";

pub fn wages_csv() -> String {
    to_csv(
        &WAGE_HEADER,
        &[
            wage("2008", "Alberta", HOURLY_WAGE_MEASURE, "Construction [23]", "Current dollars", "30.00"),
            wage("2008", "Alberta", WEEKLY_WAGE_MEASURE, "Construction [23]", "Current dollars", "1200.00"),
            wage("2019", "Alberta", HOURLY_WAGE_MEASURE, "Construction [23]", "Current dollars", "40.00"),
            wage("2019", "Alberta", HOURLY_WAGE_MEASURE, WHOLESALE, "Current dollars", "22.00"),
            wage("2019", "Alberta", WEEKLY_WAGE_MEASURE, WHOLESALE, "Current dollars", "900.00"),
            wage("2019", "Alberta", WEEKLY_WAGE_MEASURE, "Utilities [22]", "Current dollars", "2100.00"),
            wage("2019", "Alberta", HOURLY_WAGE_MEASURE, "Construction [23]", "Persons", "150.0"),
            wage("2019", "Ontario", HOURLY_WAGE_MEASURE, "Construction [23]", "Current dollars", "35.00"),
        ],
    )
}

pub fn hours_csv() -> String {
    to_csv(
        &HOURS_HEADER,
        &[
            hours("2008", HOURS_MEASURE, "Construction [23]", "Hours", "41.0"),
            hours("2019", HOURS_MEASURE, "Construction [23]", "Hours", "39.5"),
            hours("2019", HOURS_MEASURE, WHOLESALE_TABBED, "Hours", "31.2"),
            hours("2019", HOURS_MEASURE, "Educational services [61]", "Hours", "33.0"),
            hours("2019", "Number of employees at work", "Construction [23]", "Persons", "180.0"),
        ],
    )
}

pub const JOB_BANK_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<table class="table">
  <thead><tr><th>Occupation</th><th>Low</th><th>Median</th><th>High</th><th>Source</th></tr></thead>
  <tbody>
    <tr>
      <td>Welders and related machine operators (72106)</td>
      <td>21.00</td><td>33.65</td><td>48.00</td>
      <td><a href="/marketreport/wages-occupation/24360/ab">Wages</a></td>
    </tr>
    <tr>
      <td>Chefs (62200)</td>
      <td>N/A</td><td>18.00</td><td>1,234</td>
      <td><a href="/marketreport/wages-occupation/1111/ab">Wages</a></td>
    </tr>
    <tr>
      <td>Astronaut trainers (99999)</td>
      <td>30.00</td><td>40.00</td><td>50.00</td>
      <td><a href="/marketreport/wages-occupation/9999/ab">Wages</a></td>
    </tr>
    <tr>
      <td>Miscellaneous occupations</td>
      <td>N/A</td><td>N/A</td><td>N/A</td>
      <td>-</td>
    </tr>
  </tbody>
</table>
</body></html>"#;

pub fn full_http() -> FakeHttp {
    FakeHttp::default()
        .with_table(WAGES_TABLE_ID, &wages_csv())
        .with_table(HOURS_TABLE_ID, &hours_csv())
        .with(JOBS_URL, 200, JOB_BANK_PAGE.as_bytes().to_vec())
}

pub fn reference_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("reference")
}

pub fn test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.output_dir = output_dir.to_path_buf();
    config.reference_dir = reference_dir();
    config.statcan.base_url = BASE_URL.to_string();
    config.job_bank.url = JOBS_URL.to_string();
    config
}
