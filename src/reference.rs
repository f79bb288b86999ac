//! Externally curated reference data: the minimum wage series, city living
//! wage observations and the occupation title to industry sector table.
//!
//! The data lives in JSON files in a reference directory so it can be
//! updated without touching the transformation code.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::constants::{
    LIVING_WAGES_REFERENCE, MINIMUM_WAGES_REFERENCE, OCCUPATION_SECTORS_REFERENCE,
};
use crate::error::{PipelineError, Result};
use crate::types::LivingWageObservation;

#[derive(Debug, Deserialize)]
struct MinimumWageFile {
    rates: Vec<MinimumWageRate>,
}

#[derive(Debug, Deserialize)]
struct MinimumWageRate {
    year: i32,
    minimum_wage: f64,
}

#[derive(Debug, Deserialize)]
struct LivingWageFile {
    observations: Vec<LivingWageObservation>,
}

#[derive(Debug, Deserialize)]
struct SectorFile {
    sectors: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ReferenceData {
    minimum_wages: BTreeMap<i32, f64>,
    living_wages: Vec<LivingWageObservation>,
    occupation_sectors: BTreeMap<String, String>,
}

impl ReferenceData {
    /// Load the three reference files from `dir`.
    pub fn load_from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(PipelineError::Reference(format!(
                "reference directory does not exist: {}",
                dir.display()
            )));
        }

        let minimum: MinimumWageFile = read_json(&dir.join(MINIMUM_WAGES_REFERENCE))?;
        let living: LivingWageFile = read_json(&dir.join(LIVING_WAGES_REFERENCE))?;
        let sectors: SectorFile = read_json(&dir.join(OCCUPATION_SECTORS_REFERENCE))?;

        let data = Self::new(
            minimum.rates.into_iter().map(|r| (r.year, r.minimum_wage)).collect(),
            living.observations,
            sectors.sectors,
        )?;
        info!(
            minimum_wage_years = data.minimum_wages.len(),
            living_wage_observations = data.living_wages.len(),
            occupation_titles = data.occupation_sectors.len(),
            "Loaded reference data from {}",
            dir.display()
        );
        Ok(data)
    }

    /// Build from in-memory series. A year listed twice in the minimum wage
    /// series is rejected.
    pub fn new(
        minimum_wages: Vec<(i32, f64)>,
        living_wages: Vec<LivingWageObservation>,
        occupation_sectors: BTreeMap<String, String>,
    ) -> Result<Self> {
        let mut by_year = BTreeMap::new();
        for (year, rate) in minimum_wages {
            if by_year.insert(year, rate).is_some() {
                return Err(PipelineError::Reference(format!(
                    "minimum wage for {} listed more than once",
                    year
                )));
            }
        }
        Ok(Self {
            minimum_wages: by_year,
            living_wages,
            occupation_sectors,
        })
    }

    pub fn minimum_wage_by_year(&self) -> &BTreeMap<i32, f64> {
        &self.minimum_wages
    }

    /// Per-city observations, in publication order.
    pub fn living_wage_observations(&self) -> &[LivingWageObservation] {
        &self.living_wages
    }

    /// Mean of all city observations within each year.
    pub fn living_wage_by_year(&self) -> BTreeMap<i32, f64> {
        let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for obs in &self.living_wages {
            let entry = sums.entry(obs.year).or_insert((0.0, 0));
            entry.0 += obs.living_wage;
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(year, (total, count))| (year, total / count as f64))
            .collect()
    }

    pub fn occupation_sectors(&self) -> &BTreeMap<String, String> {
        &self.occupation_sectors
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading reference file {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| {
        PipelineError::Reference(format!("failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        PipelineError::Reference(format!("failed to parse {}: {}", path.display(), e))
    })
}
