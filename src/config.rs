// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Pipeline configuration.
///
/// Loaded from an optional `etl.toml` in the working directory, with
/// environment-variable overrides on top. Every field has a default, so a
/// missing or partial config file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Site origin apply links are absolutized against
    pub origin: String,
    /// Path of the paginated listing under the origin
    pub listing_path: String,
    /// Directory holding per-page, merged and normalized CSV files
    pub pages_dir: PathBuf,
    /// SQLite database file for the load stage
    pub database_path: PathBuf,
    /// Per-request network timeout in seconds
    pub request_timeout_secs: u64,
    /// Fail the run on the first per-page write error instead of
    /// logging it and continuing with an incomplete dataset
    pub strict_persistence: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.python.org".to_string(),
            listing_path: "/jobs/".to_string(),
            pages_dir: PathBuf::from("csvs"),
            database_path: PathBuf::from("jobs.db"),
            request_timeout_secs: 30,
            strict_persistence: false,
        }
    }
}

impl EtlConfig {
    /// Load configuration from `etl.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("etl.toml");

        let mut config = if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)
                .context("Failed to read etl.toml")?;
            toml::from_str(&content).context("Failed to parse etl.toml")?
        } else {
            Self::default()
        };

        if let Ok(origin) = std::env::var("PYJOBS_ORIGIN") {
            config.origin = origin;
        }
        if let Ok(dir) = std::env::var("PYJOBS_PAGES_DIR") {
            config.pages_dir = PathBuf::from(dir);
        }
        if let Ok(db) = std::env::var("PYJOBS_DATABASE") {
            config.database_path = PathBuf::from(db);
        }

        Ok(config)
    }

    pub fn with_origin(mut self, origin: String) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_pages_dir(mut self, dir: PathBuf) -> Self {
        self.pages_dir = dir;
        self
    }

    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = path;
        self
    }

    /// URL of listing page `n`
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}{}?page={}",
            self.origin.trim_end_matches('/'),
            self.listing_path,
            page
        )
    }

    /// Per-page file path, `pg{n}.csv`
    pub fn page_file(&self, page: u32) -> PathBuf {
        self.pages_dir.join(format!("pg{}.csv", page))
    }

    pub fn merged_file(&self) -> PathBuf {
        self.pages_dir.join("merged_jobs.csv")
    }

    pub fn jobs_file(&self) -> PathBuf {
        self.pages_dir.join("jobs.csv")
    }

    pub fn job_type_file(&self) -> PathBuf {
        self.pages_dir.join("job_type.csv")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
