//! Turn raw wage report rows into occupation records: split the display
//! text into title and NOC code, coerce wages, and resolve the sector.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::normalize::strip_bracketed_codes;
use crate::apis::job_bank::RawOccupationRow;
use crate::constants::NOT_AVAILABLE;
use crate::error::{PipelineError, Result};
use crate::types::OccupationRecord;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

static TITLE_AND_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*\((\d+)\)$").expect("occupation pattern"));

/// Split `"Welders and related machine operators (72106)"` into title and
/// code. Text without a trailing parenthesised number yields neither.
pub fn split_occupation(text: &str) -> (Option<String>, Option<String>) {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    match TITLE_AND_CODE.captures(&collapsed) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().to_string()),
            caps.get(2).map(|m| m.as_str().to_string()),
        ),
        None => (None, None),
    }
}

/// Parse a displayed wage. `"N/A"` is absent; thousands separators are
/// ignored. Anything else that is not a finite number is an error.
pub fn parse_wage(column: &str, text: &str) -> Result<Option<f64>> {
    let text = text.trim();
    if text == NOT_AVAILABLE {
        return Ok(None);
    }
    let invalid = || PipelineError::InvalidNumber {
        column: column.to_string(),
        value: text.to_string(),
    };
    let value: f64 = text.replace(',', "").parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(Some(value))
}

/// Look up the sector for a title and drop its NAICS code.
pub fn map_sector(title: Option<&str>, sectors: &BTreeMap<String, String>) -> Option<String> {
    title
        .and_then(|t| sectors.get(t))
        .map(|label| strip_bracketed_codes(label))
}

pub fn build_occupation_records(
    rows: &[RawOccupationRow],
    sectors: &BTreeMap<String, String>,
) -> Result<Vec<OccupationRecord>> {
    let records = rows
        .iter()
        .map(|row| {
            let (title, noc_code) = split_occupation(&row.occupation);
            if title.is_none() {
                debug!(occupation = %row.occupation, "Occupation text has no trailing NOC code");
            }
            let sector = map_sector(title.as_deref(), sectors);
            Ok(OccupationRecord {
                display_text: row.occupation.clone(),
                low_wage: parse_wage("Low Wage", &row.low_wage)?,
                median_wage: parse_wage("Median Wage", &row.median_wage)?,
                high_wage: parse_wage("High Wage", &row.high_wage)?,
                source_url: row.source.clone(),
                title,
                noc_code,
                sector,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let unmapped = records.iter().filter(|r| r.sector.is_none()).count();
    info!(
        occupations = records.len(),
        unmapped, "Resolved occupation sectors"
    );
    Ok(records)
}
