use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{PipelineError, Result};

/// Run configuration. Every field defaults to the fixed constants, so an
/// absent `config.toml` reproduces the standard Alberta run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub reference_dir: PathBuf,
    pub split_by_sector: bool,
    pub statcan: StatCanConfig,
    pub job_bank: JobBankConfig,
    pub filters: FilterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatCanConfig {
    pub base_url: String,
    pub wages_table_id: String,
    pub hours_table_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobBankConfig {
    pub url: String,
}

/// Exact-match predicates applied to the statistics tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub region: String,
    pub work_type: String,
    pub hourly_wage_measure: String,
    pub weekly_wage_measure: String,
    pub hours_measure: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            reference_dir: PathBuf::from("reference"),
            split_by_sector: false,
            statcan: StatCanConfig::default(),
            job_bank: JobBankConfig::default(),
            filters: FilterConfig::default(),
        }
    }
}

impl Default for StatCanConfig {
    fn default() -> Self {
        Self {
            base_url: constants::STATCAN_WDS_BASE_URL.to_string(),
            wages_table_id: constants::WAGES_TABLE_ID.to_string(),
            hours_table_id: constants::HOURS_TABLE_ID.to_string(),
        }
    }
}

impl Default for JobBankConfig {
    fn default() -> Self {
        Self {
            url: constants::JOB_BANK_URL.to_string(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            region: constants::REGION.to_string(),
            work_type: constants::WORK_TYPE.to_string(),
            hourly_wage_measure: constants::HOURLY_WAGE_MEASURE.to_string(),
            weekly_wage_measure: constants::WEEKLY_WAGE_MEASURE.to_string(),
            hours_measure: constants::HOURS_MEASURE.to_string(),
        }
    }
}

impl Config {
    /// Load `path` if it exists, falling back to defaults otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.statcan.wages_table_id.trim().is_empty()
            || config.statcan.hours_table_id.trim().is_empty()
        {
            return Err(PipelineError::Config("table ids must not be empty".into()));
        }
        Ok(config)
    }
}
