use anyhow::Result;

pub mod browse;
pub mod cli;
pub mod config;
pub mod error;
pub mod load;
pub mod pages;
pub mod scrape;
pub mod transform;

pub use config::EtlConfig;
pub use error::EtlError;

/// Convenience function running the whole pipeline: extract every listing
/// page, normalize the output, and load it into the relational store.
pub async fn run_pipeline(config: &EtlConfig) -> Result<load::LoadSummary> {
    scrape::run_extract(config).await?;
    transform::Transformer::new(config).run()?;

    let mut db = load::JobsDb::new(config.database_path.clone());
    db.init_pool().await?;
    db.migrate().await?;
    db.load(&config.jobs_file(), &config.job_type_file()).await
}
