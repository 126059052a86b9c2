// src/cli.rs
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::browse;
use crate::config::EtlConfig;
use crate::load::JobsDb;
use crate::scrape::run_extract;
use crate::transform::Transformer;

#[derive(Parser)]
#[command(name = "pyjobs")]
#[command(about = "ETL pipeline for the python.org jobs board")]
pub struct EtlCli {
    #[command(subcommand)]
    pub command: EtlCommand,

    /// Directory for per-page and normalized CSV files
    #[arg(long)]
    pub pages_dir: Option<PathBuf>,

    /// SQLite database file for the load stage
    #[arg(long)]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum EtlCommand {
    /// Scrape all listing pages into per-page CSV files
    Extract,
    /// Merge per-page files and split into normalized jobs/job_type outputs
    Transform,
    /// Create the relational schema and bulk-load the normalized outputs
    Load,
    /// Run extract, transform and load in sequence
    Run,
    /// Interactively browse listings filtered by location and recency
    Browse,
}

pub async fn handle_command(cli: EtlCli) -> Result<()> {
    let mut config = EtlConfig::load()?;
    if let Some(dir) = cli.pages_dir {
        config = config.with_pages_dir(dir);
    }
    if let Some(db) = cli.database {
        config = config.with_database_path(db);
    }

    match cli.command {
        EtlCommand::Extract => {
            let summary = run_extract(&config).await?;
            println!(
                "✓ Extracted {} listings across {} pages into {}",
                summary.listings,
                summary.pages,
                config.pages_dir.display()
            );
        }

        EtlCommand::Transform => {
            let summary = Transformer::new(&config).run()?;
            println!(
                "✓ Merged {} page files into {} jobs and {} job-type rows",
                summary.pages_merged, summary.jobs, summary.job_types
            );
        }

        EtlCommand::Load => {
            let summary = run_load(&config).await?;
            println!(
                "✓ Loaded {} jobs and {} job-type rows into {}",
                summary.jobs,
                summary.job_types,
                config.database_path.display()
            );
        }

        EtlCommand::Run => {
            info!("Starting full pipeline run");
            let loaded = crate::run_pipeline(&config).await?;
            println!(
                "✓ Pipeline complete: {} jobs and {} job-type rows loaded into {}",
                loaded.jobs,
                loaded.job_types,
                config.database_path.display()
            );
        }

        EtlCommand::Browse => {
            let filters = browse::prompt_filters()?;
            browse::run_browse(&config, &filters).await?;
        }
    }

    Ok(())
}

async fn run_load(config: &EtlConfig) -> Result<crate::load::LoadSummary> {
    let mut db = JobsDb::new(config.database_path.clone());
    db.init_pool().await?;
    db.migrate().await?;
    db.load(&config.jobs_file(), &config.job_type_file()).await
}
