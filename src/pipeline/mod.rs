//! Batch pipeline: fetch the statistics tables and the wage report, run the
//! transformation steps as a chain of table-in/table-out functions, then
//! write every dataset once all of them have been computed.

pub mod enrich;
pub mod normalize;
pub mod occupations;
pub mod wages;

use metrics::{counter, histogram};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

use crate::apis::job_bank::JobBankScraper;
use crate::apis::statcan::StatCanTableFetcher;
use crate::app::ports::HttpClientPort;
use crate::config::{Config, FilterConfig};
use crate::constants::{
    COL_NAICS, LIVING_WAGES_FILE, OCCUPATIONS_FILE, SECTOR_SPLIT_DIR, WAGES_AND_HOURS_FILE,
};
use crate::error::Result;
use crate::output::{self, OutputBatch};
use crate::reference::ReferenceData;
use crate::table::Table;
use crate::types::{
    DenormalizedRecord, HoursRecord, LivingWageObservation, OccupationRecord, WageRecord,
};

use self::enrich::enrich_reference_wages;
use self::normalize::{derive_year, repair_sector_labels, strip_sector_codes};
use self::occupations::build_occupation_records;
use self::wages::{
    drop_person_counts, join_hours, join_wages, prune_columns, rename_hours, select_hours,
    select_wage_measure,
};

/// Which halves of the pipeline to run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub statistics: bool,
    pub occupations: bool,
    pub split_by_sector: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            statistics: true,
            occupations: true,
            split_by_sector: false,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Default, Serialize)]
pub struct PipelineResult {
    pub wage_and_hours_rows: usize,
    pub living_wage_rows: usize,
    pub occupation_rows: usize,
    pub unmapped_occupations: usize,
    pub sector_files: usize,
    pub files_written: Vec<String>,
}

/// A fully computed dataset waiting to be written.
enum Dataset {
    WagesAndHours(Vec<DenormalizedRecord>),
    LivingWages(Vec<LivingWageObservation>),
    Occupations(Vec<OccupationRecord>),
}

impl Dataset {
    fn stage(&self, batch: &mut OutputBatch, path: &Path) -> Result<()> {
        match self {
            Dataset::WagesAndHours(records) => {
                batch.stage_records(path, &DenormalizedRecord::HEADERS, records)
            }
            Dataset::LivingWages(records) => {
                batch.stage_records(path, &LivingWageObservation::HEADERS, records)
            }
            Dataset::Occupations(records) => {
                batch.stage_records(path, &OccupationRecord::HEADERS, records)
            }
        }
    }
}

fn record_stage(stage: &'static str, table: &Table) {
    counter!("alberta_wages_rows_total", "stage" => stage).increment(table.len() as u64);
    info!(stage, rows = table.len(), "Stage complete");
}

/// Every step from raw statistics tables to the enriched denormalized table.
pub fn transform_statistics(
    wages: Table,
    hours: Table,
    filters: &FilterConfig,
    reference: &ReferenceData,
) -> Result<Table> {
    let wages = drop_person_counts(prune_columns(wages)?)?;
    let hours = drop_person_counts(prune_columns(hours)?)?;

    let hourly = select_wage_measure(&wages, filters, &filters.hourly_wage_measure)?;
    let weekly = select_wage_measure(&wages, filters, &filters.weekly_wage_measure)?;
    record_stage("hourly_wages", &hourly);
    record_stage("weekly_wages", &weekly);

    let wages = repair_sector_labels(&join_wages(&hourly, &weekly)?)?;
    let wage_records: Vec<WageRecord> = wages.deserialize()?;
    record_stage("wages_joined", &wages);

    let hours = repair_sector_labels(&rename_hours(select_hours(&hours, filters)?)?)?;
    let hours_records: Vec<HoursRecord> = hours.deserialize()?;
    record_stage("hours_selected", &hours);
    info!(
        wage_records = wage_records.len(),
        hours_records = hours_records.len(),
        "Wage and hours tables match the expected schema"
    );

    let joined = join_hours(&wages, &hours)?;
    record_stage("wages_and_hours_joined", &joined);

    let normalized = derive_year(&strip_sector_codes(&joined)?)?;
    let enriched = enrich_reference_wages(
        &normalized,
        reference.minimum_wage_by_year(),
        &reference.living_wage_by_year(),
    )?;
    record_stage("enriched", &enriched);
    Ok(enriched)
}

pub struct Pipeline {
    config: Config,
    reference: ReferenceData,
    statcan: StatCanTableFetcher,
    job_bank: JobBankScraper,
}

impl Pipeline {
    pub fn new(config: Config, reference: ReferenceData, http: Arc<dyn HttpClientPort>) -> Self {
        let statcan = StatCanTableFetcher::new(http.clone(), config.statcan.base_url.clone());
        let job_bank = JobBankScraper::new(http, config.job_bank.url.clone());
        Self {
            config,
            reference,
            statcan,
            job_bank,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch both statistics tables and run every statistics step.
    #[instrument(skip(self))]
    pub async fn build_statistics(&self) -> Result<Table> {
        let wages = self.statcan.fetch_table(&self.config.statcan.wages_table_id).await?;
        let hours = self.statcan.fetch_table(&self.config.statcan.hours_table_id).await?;
        transform_statistics(wages, hours, &self.config.filters, &self.reference)
    }

    #[instrument(skip(self))]
    pub async fn build_occupations(&self) -> Result<Vec<OccupationRecord>> {
        let rows = self.job_bank.fetch_rows().await?;
        build_occupation_records(&rows, self.reference.occupation_sectors())
    }

    /// Run the selected halves. Nothing is written unless every dataset was
    /// computed and staged successfully; the files are then replaced together.
    #[instrument(skip(self))]
    pub async fn run(&self, options: &RunOptions) -> Result<PipelineResult> {
        counter!("alberta_wages_runs_total").increment(1);
        let started = Instant::now();
        let output_dir = &self.config.output_dir;
        let mut result = PipelineResult::default();
        let mut datasets: Vec<(PathBuf, Dataset)> = Vec::new();

        if options.statistics {
            let table = self.build_statistics().await?;

            if options.split_by_sector {
                for (sector, part) in table.partition_by(COL_NAICS)? {
                    let path = output_dir
                        .join(SECTOR_SPLIT_DIR)
                        .join(output::sector_file_name(sector.as_deref()));
                    datasets.push((path, Dataset::WagesAndHours(part.deserialize()?)));
                    result.sector_files += 1;
                }
            }

            let records: Vec<DenormalizedRecord> = table.deserialize()?;
            result.wage_and_hours_rows = records.len();
            datasets.push((
                output_dir.join(WAGES_AND_HOURS_FILE),
                Dataset::WagesAndHours(records),
            ));

            let living = self.reference.living_wage_observations().to_vec();
            result.living_wage_rows = living.len();
            datasets.push((output_dir.join(LIVING_WAGES_FILE), Dataset::LivingWages(living)));
        }

        if options.occupations {
            let records = self.build_occupations().await?;
            result.occupation_rows = records.len();
            result.unmapped_occupations = records.iter().filter(|r| r.sector.is_none()).count();
            datasets.push((output_dir.join(OCCUPATIONS_FILE), Dataset::Occupations(records)));
        }

        let mut batch = OutputBatch::new();
        for (path, dataset) in &datasets {
            dataset.stage(&mut batch, path)?;
        }
        for path in batch.commit()? {
            info!("Wrote {}", path.display());
            result.files_written.push(path.to_string_lossy().to_string());
        }

        histogram!("alberta_wages_run_duration_seconds").record(started.elapsed().as_secs_f64());
        info!(
            files = result.files_written.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline finished"
        );
        Ok(result)
    }
}
