use serde::{Deserialize, Serialize};

/// One hourly/weekly wage observation after the wage join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageRecord {
    #[serde(rename = "REF_DATE")]
    pub ref_date: String,
    #[serde(rename = "GEO")]
    pub region: String,
    #[serde(rename = "Type of work")]
    pub work_type: Option<String>,
    #[serde(rename = "North American Industry Classification System (NAICS)")]
    pub sector: Option<String>,
    #[serde(rename = "Sex")]
    pub sex: Option<String>,
    #[serde(rename = "Age group")]
    pub age_group: Option<String>,
    #[serde(rename = "UOM_wages")]
    pub unit_of_measure: Option<String>,
    #[serde(rename = "Hourly Wage")]
    pub hourly_wage: Option<f64>,
    #[serde(rename = "Weekly Wage")]
    pub weekly_wage: Option<f64>,
}

/// One average-hours observation after renaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursRecord {
    #[serde(rename = "REF_DATE")]
    pub ref_date: String,
    #[serde(rename = "GEO")]
    pub region: String,
    #[serde(rename = "North American Industry Classification System (NAICS)")]
    pub sector: Option<String>,
    #[serde(rename = "Sex")]
    pub sex: Option<String>,
    #[serde(rename = "UOM_hours")]
    pub unit_of_measure: Option<String>,
    #[serde(rename = "Weekly Hours")]
    pub weekly_hours: Option<f64>,
}

/// Wage and hours fields joined per key, plus the year and reference rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenormalizedRecord {
    #[serde(rename = "REF_DATE")]
    pub ref_date: String,
    #[serde(rename = "GEO")]
    pub region: String,
    #[serde(rename = "Type of work")]
    pub work_type: Option<String>,
    #[serde(rename = "North American Industry Classification System (NAICS)")]
    pub sector: Option<String>,
    #[serde(rename = "Sex")]
    pub sex: Option<String>,
    #[serde(rename = "Age group")]
    pub age_group: Option<String>,
    #[serde(rename = "UOM_wages")]
    pub wage_unit_of_measure: Option<String>,
    #[serde(rename = "Hourly Wage")]
    pub hourly_wage: Option<f64>,
    #[serde(rename = "Weekly Wage")]
    pub weekly_wage: Option<f64>,
    #[serde(rename = "Actual hours worked")]
    pub hours_measure: Option<String>,
    #[serde(rename = "UOM_hours")]
    pub hours_unit_of_measure: Option<String>,
    #[serde(rename = "Weekly Hours")]
    pub weekly_hours: Option<f64>,
    #[serde(rename = "YEAR")]
    pub year: i32,
    #[serde(rename = "MINIMUM_WAGE")]
    pub minimum_wage: Option<f64>,
    #[serde(rename = "LIVING_WAGE")]
    pub living_wage: Option<f64>,
}

/// A job board row split into title and NOC code with numeric wages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationRecord {
    #[serde(rename = "Occupation")]
    pub display_text: String,
    #[serde(rename = "Low Wage")]
    pub low_wage: Option<f64>,
    #[serde(rename = "Median Wage")]
    pub median_wage: Option<f64>,
    #[serde(rename = "High Wage")]
    pub high_wage: Option<f64>,
    #[serde(rename = "Source")]
    pub source_url: Option<String>,
    #[serde(rename = "Occupation Title")]
    pub title: Option<String>,
    #[serde(rename = "NOC")]
    pub noc_code: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
}

/// A single city's living wage for one year, as published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivingWageObservation {
    #[serde(rename = "YEAR", alias = "year")]
    pub year: i32,
    #[serde(rename = "CITY", alias = "city")]
    pub city: String,
    #[serde(rename = "PROVINCE", alias = "province")]
    pub province: String,
    #[serde(rename = "LIVING_WAGE", alias = "living_wage")]
    pub living_wage: f64,
}

impl DenormalizedRecord {
    pub const HEADERS: [&'static str; 15] = [
        "REF_DATE",
        "GEO",
        "Type of work",
        "North American Industry Classification System (NAICS)",
        "Sex",
        "Age group",
        "UOM_wages",
        "Hourly Wage",
        "Weekly Wage",
        "Actual hours worked",
        "UOM_hours",
        "Weekly Hours",
        "YEAR",
        "MINIMUM_WAGE",
        "LIVING_WAGE",
    ];
}

impl OccupationRecord {
    pub const HEADERS: [&'static str; 8] = [
        "Occupation",
        "Low Wage",
        "Median Wage",
        "High Wage",
        "Source",
        "Occupation Title",
        "NOC",
        "Sector",
    ];
}

impl LivingWageObservation {
    pub const HEADERS: [&'static str; 4] = ["YEAR", "CITY", "PROVINCE", "LIVING_WAGE"];
}
