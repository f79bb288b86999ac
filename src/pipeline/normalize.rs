//! Label normalization shared by the statistics and occupation halves of the
//! pipeline, and derivation of the YEAR column.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{COL_NAICS, COL_REF_DATE, COL_YEAR};
use crate::error::{PipelineError, Result};
use crate::table::Table;

static BRACKETED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[[^\]]*\]").expect("bracketed code pattern"));

static TABBED_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*\t[ \t]*").expect("tab run pattern"));

/// Drop every bracketed classification code together with the whitespace
/// before it: `"Manufacturing [31-33]"` becomes `"Manufacturing"`. Labels
/// without a bracket are returned unchanged.
pub fn strip_bracketed_codes(label: &str) -> String {
    BRACKETED_CODE.replace_all(label, "").into_owned()
}

/// Collapse any whitespace run containing a tab into a single space.
/// One published hours label reads `"Wholesale and retail trade\t\t [41, 44-45]"`.
pub fn repair_sector_whitespace(label: &str) -> String {
    TABBED_WHITESPACE.replace_all(label, " ").into_owned()
}

/// Apply [`repair_sector_whitespace`] to the sector column so join keys agree.
pub fn repair_sector_labels(table: &Table) -> Result<Table> {
    table.map_column(COL_NAICS, |v| v.map(repair_sector_whitespace))
}

/// Rewrite every sector label without its bracketed NAICS code.
pub fn strip_sector_codes(table: &Table) -> Result<Table> {
    table.map_column(COL_NAICS, |v| v.map(strip_bracketed_codes))
}

/// Calendar year of a reference date. Statistics Canada publishes `YYYY`,
/// `YYYY-MM` or `YYYY-MM-DD` depending on the table frequency.
pub fn year_of(ref_date: &str) -> Result<i32> {
    let trimmed = ref_date.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.year());
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d") {
        return Ok(date.year());
    }
    if trimmed.len() == 4 {
        if let Ok(year) = trimmed.parse::<i32>() {
            return Ok(year);
        }
    }
    Err(PipelineError::InvalidDate(ref_date.to_string()))
}

/// Append a YEAR column derived from REF_DATE.
pub fn derive_year(table: &Table) -> Result<Table> {
    table.with_derived_column(COL_YEAR, COL_REF_DATE, |date| {
        let date = date.ok_or_else(|| PipelineError::InvalidDate("<absent>".into()))?;
        Ok(Some(year_of(date)?.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::table_of;

    #[test]
    fn test_strip_bracketed_codes() {
        assert_eq!(strip_bracketed_codes("Manufacturing [31-33]"), "Manufacturing");
        assert_eq!(
            strip_bracketed_codes("Information, culture and recreation [51, 71]"),
            "Information, culture and recreation"
        );
        assert_eq!(
            strip_bracketed_codes("Wholesale and retail trade\t\t [41, 44-45]"),
            "Wholesale and retail trade"
        );
    }

    #[test]
    fn test_labels_without_brackets_are_unchanged() {
        for label in ["Services-producing sector", "Total employees, all industries", "  padded  "] {
            assert_eq!(strip_bracketed_codes(label), label);
        }
    }

    #[test]
    fn test_repair_sector_whitespace_merges_tabbed_variant() {
        let tabbed = repair_sector_whitespace("Wholesale and retail trade\t\t [41, 44-45]");
        assert_eq!(tabbed, "Wholesale and retail trade [41, 44-45]");
        assert_eq!(
            repair_sector_whitespace("Wholesale and retail trade [41, 44-45]"),
            "Wholesale and retail trade [41, 44-45]"
        );
    }

    #[test]
    fn test_year_of_supported_formats() {
        assert_eq!(year_of("2019").unwrap(), 2019);
        assert_eq!(year_of("2019-07").unwrap(), 2019);
        assert_eq!(year_of("2008-01-01").unwrap(), 2008);
        assert!(matches!(year_of("last year"), Err(PipelineError::InvalidDate(_))));
    }

    #[test]
    fn test_derive_year_and_strip_codes_on_table() {
        let table = table_of(
            &["REF_DATE", COL_NAICS],
            &[&["2019-01", "Construction [23]"], &["2020", "Services-producing sector"]],
        );
        let out = derive_year(&strip_sector_codes(&table).unwrap()).unwrap();

        assert_eq!(out.column(COL_YEAR).unwrap(), vec![Some("2019"), Some("2020")]);
        assert_eq!(
            out.column(COL_NAICS).unwrap(),
            vec![Some("Construction"), Some("Services-producing sector")]
        );
    }

    #[test]
    fn test_derive_year_absent_date_is_fatal() {
        let table = table_of(&["REF_DATE"], &[&[""]]);
        assert!(matches!(derive_year(&table), Err(PipelineError::InvalidDate(_))));
    }
}
