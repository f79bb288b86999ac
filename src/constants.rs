//! Fixed identifiers for the upstream sources, the column names they publish,
//! and the names of the files this pipeline writes.

// Statistics Canada tables
pub const WAGES_TABLE_ID: &str = "14100064";
pub const HOURS_TABLE_ID: &str = "14100037";
pub const STATCAN_WDS_BASE_URL: &str = "https://www150.statcan.gc.ca/t1/wds/rest";

// Job Bank wage report for Alberta
pub const JOB_BANK_URL: &str = "https://www.jobbank.gc.ca/wagereport/location/ab";

// Administrative columns that carry no analytical value downstream
pub const ADMIN_COLUMNS: [&str; 10] = [
    "DGUID",
    "UOM_ID",
    "SCALAR_FACTOR",
    "SCALAR_ID",
    "VECTOR",
    "COORDINATE",
    "STATUS",
    "SYMBOL",
    "TERMINATED",
    "DECIMALS",
];

// Source column names
pub const COL_REF_DATE: &str = "REF_DATE";
pub const COL_GEO: &str = "GEO";
pub const COL_WAGES: &str = "Wages";
pub const COL_TYPE_OF_WORK: &str = "Type of work";
pub const COL_NAICS: &str = "North American Industry Classification System (NAICS)";
pub const COL_SEX: &str = "Sex";
pub const COL_AGE_GROUP: &str = "Age group";
pub const COL_UOM: &str = "UOM";
pub const COL_VALUE: &str = "VALUE";
pub const COL_HOURS_WORKED: &str = "Actual hours worked";

// Columns introduced by this pipeline
pub const COL_UOM_WAGES: &str = "UOM_wages";
pub const COL_UOM_HOURS: &str = "UOM_hours";
pub const COL_HOURLY_WAGE: &str = "Hourly Wage";
pub const COL_WEEKLY_WAGE: &str = "Weekly Wage";
pub const COL_WEEKLY_HOURS: &str = "Weekly Hours";
pub const COL_YEAR: &str = "YEAR";
pub const COL_MINIMUM_WAGE: &str = "MINIMUM_WAGE";
pub const COL_LIVING_WAGE: &str = "LIVING_WAGE";

// Row filter values
pub const PERSONS_UOM: &str = "Persons";
pub const REGION: &str = "Alberta";
pub const HOURLY_WAGE_MEASURE: &str = "Average hourly wage rate";
pub const WEEKLY_WAGE_MEASURE: &str = "Average weekly wage rate";
pub const WORK_TYPE: &str = "Both full- and part-time employees";
pub const HOURS_MEASURE: &str = "Average actual hours (worked in reference week, main job)";

// Sentinel the job board uses for suppressed wage figures
pub const NOT_AVAILABLE: &str = "N/A";

// Output files
pub const WAGES_AND_HOURS_FILE: &str = "Complete_Wages_and_Hours_by_sector.csv";
pub const LIVING_WAGES_FILE: &str = "Living_Wages_Map.csv";
pub const OCCUPATIONS_FILE: &str = "Complete_Occupations.csv";
pub const SECTOR_SPLIT_DIR: &str = "sectors";

// Reference data files
pub const MINIMUM_WAGES_REFERENCE: &str = "minimum_wages.json";
pub const LIVING_WAGES_REFERENCE: &str = "living_wages.json";
pub const OCCUPATION_SECTORS_REFERENCE: &str = "occupation_sectors.json";

/// Key shared by the hourly and weekly wage subsets.
pub const WAGE_JOIN_KEYS: [&str; 6] = [
    COL_REF_DATE,
    COL_GEO,
    COL_TYPE_OF_WORK,
    COL_NAICS,
    COL_SEX,
    COL_AGE_GROUP,
];

/// Key shared by the wage and hours tables.
pub const HOURS_JOIN_KEYS: [&str; 4] = [COL_REF_DATE, COL_GEO, COL_NAICS, COL_SEX];
