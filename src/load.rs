// src/load.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::transform::{JobsRow, JobTypeRow};

/// Relational sink for the normalized outputs.
///
/// Two tables: `jobs` keyed by the dense job_id assigned during the merge
/// pass, and `job_type` with one row per (job, type) pair and a foreign key
/// back to `jobs`.
#[derive(Debug)]
pub struct JobsDb {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoadSummary {
    pub jobs: usize,
    pub job_types: usize,
}

impl JobsDb {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Create the two-table schema if it is not there yet
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                job_id INTEGER PRIMARY KEY,
                job_title TEXT NOT NULL,
                company_name TEXT NOT NULL,
                location TEXT NOT NULL,
                posted_date TEXT NOT NULL,
                job_category TEXT NOT NULL,
                job_apply_url TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS job_type (
                job_type_id INTEGER PRIMARY KEY AUTOINCREMENT,
                job_id INTEGER NOT NULL,
                job_type TEXT NOT NULL,
                FOREIGN KEY (job_id) REFERENCES jobs(job_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_job_type_job_id
            ON job_type(job_id);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Replace both tables' contents with the normalized CSV outputs.
    ///
    /// Everything happens in one transaction, so a half-loaded dataset is
    /// never visible to readers.
    pub async fn load(&self, jobs_csv: &Path, job_type_csv: &Path) -> Result<LoadSummary> {
        let jobs = read_rows::<JobsRow>(jobs_csv)?;
        let job_types = read_rows::<JobTypeRow>(job_type_csv)?;

        let pool = self.pool()?;
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM job_type").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM jobs").execute(&mut *tx).await?;

        for row in &jobs {
            sqlx::query(
                r#"
                INSERT INTO jobs (job_id, job_title, company_name, location,
                                  posted_date, job_category, job_apply_url)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.job_id)
            .bind(&row.job_title)
            .bind(&row.company_name)
            .bind(&row.location)
            .bind(row.posted_date)
            .bind(&row.job_category)
            .bind(&row.job_apply_full_link)
            .execute(&mut *tx)
            .await?;
        }

        for row in &job_types {
            sqlx::query("INSERT INTO job_type (job_id, job_type) VALUES (?, ?)")
                .bind(row.job_id)
                .bind(&row.job_type)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            jobs = jobs.len(),
            job_types = job_types.len(),
            "Tables loaded successfully"
        );
        Ok(LoadSummary {
            jobs: jobs.len(),
            job_types: job_types.len(),
        })
    }
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .with_context(|| format!("Failed to read rows from {}", path.display()))
}
