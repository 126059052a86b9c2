// src/error.rs
//! Error types for the jobs ETL pipeline.
//!
//! One variant per failure class the pipeline distinguishes:
//! - `Transport`: network/HTTP failure on a primary content fetch
//! - `MalformedPage`: listing markup no longer matches the expected shape
//! - `Persistence`: a tabular file could not be written or read back
//! - `Decode`: the job_type column of an intermediate file is corrupt

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    /// Network or HTTP failure while fetching page content
    #[error("transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    /// Page markup does not match the expected listing structure
    #[error("malformed page {page}: {detail}")]
    MalformedPage { page: u32, detail: String },

    /// File write/read failure for a tabular output
    #[error("persistence failure for {path}: {message}")]
    Persistence { path: String, message: String },

    /// Corrupt job_type encoding in an intermediate file
    #[error("undecodable job_type column for job_id {job_id}: {detail}")]
    Decode { job_id: i64, detail: String },
}

impl EtlError {
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed(page: u32, detail: impl Into<String>) -> Self {
        Self::MalformedPage {
            page,
            detail: detail.into(),
        }
    }

    pub fn persistence(path: &Path, message: impl ToString) -> Self {
        Self::Persistence {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn decode(job_id: i64, detail: impl ToString) -> Self {
        Self::Decode {
            job_id,
            detail: detail.to_string(),
        }
    }
}
