use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use alberta_wages::app::ports::HttpClientPort;
use alberta_wages::config::Config;
use alberta_wages::infra::http_client::ReqwestHttp;
use alberta_wages::logging;
use alberta_wages::pipeline::{Pipeline, PipelineResult, RunOptions};
use alberta_wages::reference::ReferenceData;

#[derive(Parser)]
#[command(name = "alberta_wages")]
#[command(about = "Alberta wages, hours and occupations dataset builder")]
#[command(version)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Directory the CSV files are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Directory holding the reference JSON files
    #[arg(long, global = true)]
    reference_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every dataset
    Run {
        /// Also write one CSV per sector of the wages and hours table
        #[arg(long)]
        split_by_sector: bool,
        /// Only build the statistics datasets
        #[arg(long)]
        skip_occupations: bool,
    },
    /// Build only the occupations dataset
    Occupations,
}

fn print_summary(result: &PipelineResult) {
    println!("\n📊 Pipeline results:");
    println!("   Wages and hours rows: {}", result.wage_and_hours_rows);
    println!("   Living wage observations: {}", result.living_wage_rows);
    println!(
        "   Occupations: {} ({} without a sector)",
        result.occupation_rows, result.unmapped_occupations
    );
    if result.sector_files > 0 {
        println!("   Sector files: {}", result.sector_files);
    }
    for file in &result.files_written {
        println!("   💾 {}", file);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(dir) = cli.reference_dir {
        config.reference_dir = dir;
    }

    let options = match cli.command {
        Commands::Run {
            split_by_sector,
            skip_occupations,
        } => RunOptions {
            statistics: true,
            occupations: !skip_occupations,
            split_by_sector: split_by_sector || config.split_by_sector,
        },
        Commands::Occupations => RunOptions {
            statistics: false,
            occupations: true,
            split_by_sector: false,
        },
    };

    let reference = ReferenceData::load_from_directory(&config.reference_dir)
        .context("loading reference data")?;
    let http: Arc<dyn HttpClientPort> =
        Arc::new(ReqwestHttp::new().context("building HTTP client")?);
    let pipeline = Pipeline::new(config, reference, http);

    info!(output_dir = %pipeline.config().output_dir.display(), "Starting run");
    match pipeline.run(&options).await {
        Ok(result) => {
            print_summary(&result);
            Ok(())
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            println!("❌ Pipeline failed: {}", e);
            Err(e.into())
        }
    }
}
