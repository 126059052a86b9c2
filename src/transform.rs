// src/transform.rs
//! Merge & normalize transform.
//!
//! Two passes over the pages directory. The merge pass concatenates every
//! per-page file in page order into `merged_jobs.csv`, assigning each row a
//! dense 1-based job_id in concatenation order, so re-running on the same
//! inputs reproduces identical ids. The split pass projects the merged file
//! into the two normalized outputs: `jobs.csv` (scalar columns keyed by
//! job_id) and `job_type.csv` (one row per job × type). A row whose
//! job_type column fails to decode aborts the whole split before either
//! output file is created.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::config::EtlConfig;
use crate::error::EtlError;
use crate::pages::{decode_job_types, PageRow, PageStore};

/// Row of `merged_jobs.csv`: a page row plus the global job_id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRow {
    pub job_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    pub posted_date: NaiveDate,
    pub job_category: String,
    pub job_apply_full_link: String,
}

impl MergedRow {
    fn new(job_id: i64, row: PageRow) -> Self {
        Self {
            job_id,
            job_title: row.job_title,
            company_name: row.company_name,
            location: row.location,
            job_type: row.job_type,
            posted_date: row.posted_date,
            job_category: row.job_category,
            job_apply_full_link: row.job_apply_full_link,
        }
    }
}

/// Row of `jobs.csv`: every merged column except job_type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsRow {
    pub job_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub posted_date: NaiveDate,
    pub job_category: String,
    pub job_apply_full_link: String,
}

/// Row of `job_type.csv`: one per (job, type) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTypeRow {
    pub job_id: i64,
    pub job_type: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TransformSummary {
    pub pages_merged: usize,
    pub jobs: usize,
    pub job_types: usize,
}

pub struct Transformer<'a> {
    config: &'a EtlConfig,
}

impl<'a> Transformer<'a> {
    pub fn new(config: &'a EtlConfig) -> Self {
        Self { config }
    }

    /// Run both passes and report totals
    pub fn run(&self) -> Result<TransformSummary, EtlError> {
        let pages_merged = self.merge()?;
        let (jobs, job_types) = self.split()?;
        Ok(TransformSummary {
            pages_merged,
            jobs,
            job_types,
        })
    }

    /// Merge pass: concatenate all page files into `merged_jobs.csv` with a
    /// dense 1-based job_id. Returns the number of page files merged.
    pub fn merge(&self) -> Result<usize, EtlError> {
        info!("Merging all page files");

        let store = PageStore::new(self.config.pages_dir.clone());
        let files = store.page_files()?;
        if files.is_empty() {
            return Err(EtlError::persistence(
                &self.config.pages_dir,
                "no page files to merge",
            ));
        }

        let merged_path = self.config.merged_file();
        let mut writer = csv::Writer::from_path(&merged_path)
            .map_err(|err| EtlError::persistence(&merged_path, err))?;

        let mut job_id: i64 = 0;
        for (page, path) in &files {
            let mut reader = csv::Reader::from_path(path)
                .map_err(|err| EtlError::persistence(path, err))?;
            for row in reader.deserialize::<PageRow>() {
                let row = row.map_err(|err| EtlError::persistence(path, err))?;
                job_id += 1;
                writer
                    .serialize(MergedRow::new(job_id, row))
                    .map_err(|err| EtlError::persistence(&merged_path, err))?;
            }
            info!(page, "Merged page file");
        }
        writer
            .flush()
            .map_err(|err| EtlError::persistence(&merged_path, err))?;

        info!(pages = files.len(), rows = job_id, "Merging successful");
        Ok(files.len())
    }

    /// Split pass: project `jobs.csv` and explode `job_type.csv` out of the
    /// merged file. Returns (job rows, job-type rows) written.
    pub fn split(&self) -> Result<(usize, usize), EtlError> {
        info!("Separating jobs and job_type data");

        let merged_path = self.config.merged_file();
        let mut reader = csv::Reader::from_path(&merged_path)
            .map_err(|err| EtlError::persistence(&merged_path, err))?;

        // Decode everything up front: a corrupt job_type column anywhere
        // must fail the pass before either output file exists.
        let mut jobs = Vec::new();
        let mut types = Vec::new();
        for row in reader.deserialize::<MergedRow>() {
            let row = row.map_err(|err| EtlError::persistence(&merged_path, err))?;
            let decoded = decode_job_types(&row.job_type)
                .map_err(|err| EtlError::decode(row.job_id, err))?;

            // A job with zero types contributes zero rows here
            for job_type in decoded {
                types.push(JobTypeRow {
                    job_id: row.job_id,
                    job_type,
                });
            }
            jobs.push(JobsRow {
                job_id: row.job_id,
                job_title: row.job_title,
                company_name: row.company_name,
                location: row.location,
                posted_date: row.posted_date,
                job_category: row.job_category,
                job_apply_full_link: row.job_apply_full_link,
            });
        }

        write_rows(&self.config.jobs_file(), &jobs)?;
        write_rows(&self.config.job_type_file(), &types)?;

        info!(
            jobs = jobs.len(),
            job_types = types.len(),
            "Separating jobs and job_type data successful"
        );
        Ok((jobs.len(), types.len()))
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), EtlError> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|err| EtlError::persistence(path, err))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| EtlError::persistence(path, err))?;
    }
    writer.flush().map_err(|err| EtlError::persistence(path, err))
}
