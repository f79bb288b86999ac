//! Column pruning, row filtering and the two full outer joins that turn the
//! raw wage and hours tables into one wide table.

use crate::config::FilterConfig;
use crate::constants::{
    ADMIN_COLUMNS, COL_GEO, COL_HOURLY_WAGE, COL_HOURS_WORKED, COL_TYPE_OF_WORK, COL_UOM,
    COL_UOM_HOURS, COL_UOM_WAGES, COL_VALUE, COL_WAGES, COL_WEEKLY_HOURS, COL_WEEKLY_WAGE,
    HOURS_JOIN_KEYS, PERSONS_UOM, WAGE_JOIN_KEYS,
};
use crate::error::Result;
use crate::table::Table;

/// Remove the administrative columns published with every table.
pub fn prune_columns(table: Table) -> Result<Table> {
    table.drop_columns(&ADMIN_COLUMNS)
}

/// Remove headcount rows; only rates are kept.
pub fn drop_person_counts(table: Table) -> Result<Table> {
    table.drop_rows_where(COL_UOM, PERSONS_UOM)
}

/// Wage rows for the configured region and work type with the given measure.
pub fn select_wage_measure(table: &Table, filters: &FilterConfig, measure: &str) -> Result<Table> {
    table.filter_eq(&[
        (COL_GEO, filters.region.as_str()),
        (COL_WAGES, measure),
        (COL_TYPE_OF_WORK, filters.work_type.as_str()),
    ])
}

pub fn select_hours(table: &Table, filters: &FilterConfig) -> Result<Table> {
    table.filter_eq(&[
        (COL_GEO, filters.region.as_str()),
        (COL_HOURS_WORKED, filters.hours_measure.as_str()),
    ])
}

/// Put hourly and weekly rates side by side, one row per key.
pub fn join_wages(hourly: &Table, weekly: &Table) -> Result<Table> {
    let suffixed = |col: &str, suffix: &str| format!("{}{}", col, suffix);
    let wages_x = suffixed(COL_WAGES, "_x");
    let wages_y = suffixed(COL_WAGES, "_y");
    let uom_x = suffixed(COL_UOM, "_x");
    let uom_y = suffixed(COL_UOM, "_y");
    let value_x = suffixed(COL_VALUE, "_x");
    let value_y = suffixed(COL_VALUE, "_y");

    hourly
        .outer_join(weekly, &WAGE_JOIN_KEYS, ("_x", "_y"))?
        .drop_columns(&[wages_x.as_str(), wages_y.as_str(), uom_y.as_str()])?
        .rename_columns(&[
            (uom_x.as_str(), COL_UOM_WAGES),
            (value_x.as_str(), COL_HOURLY_WAGE),
            (value_y.as_str(), COL_WEEKLY_WAGE),
        ])
}

pub fn rename_hours(hours: Table) -> Result<Table> {
    hours.rename_columns(&[(COL_UOM, COL_UOM_HOURS), (COL_VALUE, COL_WEEKLY_HOURS)])
}

/// Attach average weekly hours to the wage rows.
pub fn join_hours(wages: &Table, hours: &Table) -> Result<Table> {
    wages.outer_join(hours, &HOURS_JOIN_KEYS, ("_wages", "_hours"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::error::PipelineError;
    use crate::table::table_of;

    const WAGE_COLUMNS: [&str; 19] = [
        "REF_DATE", "GEO", "DGUID", "Wages", "Type of work", COL_NAICS, "Sex", "Age group",
        "UOM", "UOM_ID", "SCALAR_FACTOR", "SCALAR_ID", "VECTOR", "COORDINATE", "VALUE",
        "STATUS", "SYMBOL", "TERMINATED", "DECIMALS",
    ];

    fn wage_row<'a>(geo: &'a str, measure: &'a str, uom: &'a str, value: &'a str) -> [&'a str; 19] {
        [
            "2019", geo, "2016A000248", measure, WORK_TYPE, "Construction [23]", "Both sexes",
            "15 years and over", uom, "81", "units", "0", "v1", "1.1", value, "", "", "", "2",
        ]
    }

    #[test]
    fn test_prune_then_filter() {
        let table = table_of(
            &WAGE_COLUMNS,
            &[
                &wage_row("Alberta", HOURLY_WAGE_MEASURE, "Current dollars", "34.5"),
                &wage_row("Alberta", HOURLY_WAGE_MEASURE, "Persons", "120.0"),
                &wage_row("Ontario", HOURLY_WAGE_MEASURE, "Current dollars", "31.0"),
                &wage_row("Alberta", WEEKLY_WAGE_MEASURE, "Current dollars", "1300.0"),
            ],
        );

        let cleaned = drop_person_counts(prune_columns(table).unwrap()).unwrap();
        assert_eq!(cleaned.columns().len(), 9);
        assert!(cleaned.column_index("DGUID").is_err());
        assert_eq!(cleaned.len(), 3);

        let filters = FilterConfig::default();
        let hourly = select_wage_measure(&cleaned, &filters, HOURLY_WAGE_MEASURE).unwrap();
        assert_eq!(hourly.column(COL_VALUE).unwrap(), vec![Some("34.5")]);
    }

    #[test]
    fn test_prune_reports_schema_drift() {
        let table = table_of(&["REF_DATE", "GEO", "VALUE"], &[]);
        assert!(matches!(prune_columns(table), Err(PipelineError::MissingColumn(_))));
    }

    #[test]
    fn test_join_wages_renames_and_keeps_partial_rows() {
        let columns = ["REF_DATE", "GEO", "Wages", "Type of work", COL_NAICS, "Sex", "Age group", "UOM", "VALUE"];
        let hourly = table_of(
            &columns,
            &[
                &["2019", "Alberta", HOURLY_WAGE_MEASURE, WORK_TYPE, "Utilities [22]", "Both sexes", "15 years and over", "Current dollars", "45.1"],
                &["2019", "Alberta", HOURLY_WAGE_MEASURE, WORK_TYPE, "Agriculture [111-112, 1100, 1151-1152]", "Both sexes", "15 years and over", "Current dollars", "19.2"],
            ],
        );
        let weekly = table_of(
            &columns,
            &[
                &["2019", "Alberta", WEEKLY_WAGE_MEASURE, WORK_TYPE, "Utilities [22]", "Both sexes", "15 years and over", "Current dollars", "1750.0"],
                &["2019", "Alberta", WEEKLY_WAGE_MEASURE, WORK_TYPE, "Construction [23]", "Both sexes", "15 years and over", "Current dollars", "1400.0"],
            ],
        );

        let joined = join_wages(&hourly, &weekly).unwrap();
        assert_eq!(
            joined.columns(),
            &["REF_DATE", "GEO", "Type of work", COL_NAICS, "Sex", "Age group", "UOM_wages", "Hourly Wage", "Weekly Wage"]
        );
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.column(COL_HOURLY_WAGE).unwrap(), vec![Some("45.1"), Some("19.2"), None]);
        assert_eq!(joined.column(COL_WEEKLY_WAGE).unwrap(), vec![Some("1750.0"), None, Some("1400.0")]);
        assert_eq!(
            joined.column(COL_NAICS).unwrap()[2],
            Some("Construction [23]")
        );
    }

    #[test]
    fn test_join_hours_on_shared_keys() {
        let wages = table_of(
            &["REF_DATE", "GEO", "Type of work", COL_NAICS, "Sex", "Age group", "UOM_wages", "Hourly Wage", "Weekly Wage"],
            &[&["2019", "Alberta", WORK_TYPE, "Utilities [22]", "Both sexes", "15 years and over", "Current dollars", "45.1", "1750.0"]],
        );
        let hours = rename_hours(table_of(
            &["REF_DATE", "GEO", "Actual hours worked", COL_NAICS, "Sex", "UOM", "VALUE"],
            &[
                &["2019", "Alberta", HOURS_MEASURE, "Utilities [22]", "Both sexes", "Hours", "38.9"],
                &["2019", "Alberta", HOURS_MEASURE, "Utilities [22]", "Males", "Hours", "40.1"],
            ],
        ))
        .unwrap();

        let joined = join_hours(&wages, &hours).unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.column(COL_WEEKLY_HOURS).unwrap(), vec![Some("38.9"), Some("40.1")]);
        assert_eq!(joined.column(COL_UOM_HOURS).unwrap(), vec![Some("Hours"), Some("Hours")]);
        assert_eq!(joined.column(COL_HOURLY_WAGE).unwrap(), vec![Some("45.1"), None]);
        assert_eq!(joined.column("Sex").unwrap(), vec![Some("Both sexes"), Some("Males")]);
    }
}
