//! Broadcast per-year reference rates onto the denormalized table.

use std::collections::BTreeMap;
use tracing::debug;

use crate::constants::{COL_LIVING_WAGE, COL_MINIMUM_WAGE, COL_YEAR};
use crate::error::{PipelineError, Result};
use crate::table::Table;

fn parse_year(value: Option<&str>) -> Result<Option<i32>> {
    value
        .map(|v| {
            v.parse::<i32>().map_err(|_| PipelineError::InvalidNumber {
                column: COL_YEAR.to_string(),
                value: v.to_string(),
            })
        })
        .transpose()
}

/// Add `column` holding `rates[YEAR]` for every row whose year has a rate.
/// Years without a rate keep an absent value.
pub fn broadcast_by_year(table: &Table, column: &str, rates: &BTreeMap<i32, f64>) -> Result<Table> {
    let missing: Vec<i32> = table
        .distinct(COL_YEAR)?
        .iter()
        .filter_map(|y| parse_year(y.as_deref()).ok().flatten())
        .filter(|y| !rates.contains_key(y))
        .collect();
    if !missing.is_empty() {
        debug!(column, ?missing, "Years without a reference rate are left blank");
    }

    table.with_derived_column(column, COL_YEAR, |year| {
        Ok(parse_year(year)?
            .and_then(|y| rates.get(&y))
            .map(|rate| rate.to_string()))
    })
}

/// Add MINIMUM_WAGE and LIVING_WAGE columns keyed on YEAR.
pub fn enrich_reference_wages(
    table: &Table,
    minimum_wages: &BTreeMap<i32, f64>,
    living_wages: &BTreeMap<i32, f64>,
) -> Result<Table> {
    let with_minimum = broadcast_by_year(table, COL_MINIMUM_WAGE, minimum_wages)?;
    broadcast_by_year(&with_minimum, COL_LIVING_WAGE, living_wages)
}
