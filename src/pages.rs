// src/pages.rs
//! Per-page CSV persistence.
//!
//! Each scraped page becomes one `pg{n}.csv` under the pages directory, with
//! a fixed column order matching the listing fields. The multi-valued
//! job_type column is stored as a JSON array of strings so the transform
//! stage has one documented encoding to decode, independent of any
//! language's literal syntax.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::error::EtlError;
use crate::scrape::{JobListing, PageResult};

/// One row of a per-page file, in output column order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRow {
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    pub posted_date: NaiveDate,
    pub job_category: String,
    pub job_apply_full_link: String,
}

impl From<&JobListing> for PageRow {
    fn from(listing: &JobListing) -> Self {
        Self {
            job_title: listing.title.clone(),
            company_name: listing.company.clone(),
            location: listing.location.clone(),
            job_type: encode_job_types(&listing.job_types),
            posted_date: listing.posted_date,
            job_category: listing.category.clone(),
            job_apply_full_link: listing.apply_url.clone(),
        }
    }
}

/// Encode an ordered job-type sequence for the job_type column
pub fn encode_job_types(types: &[String]) -> String {
    serde_json::to_string(types).expect("string list serializes to JSON")
}

/// Decode a job_type column back into its ordered sequence, trimming
/// incidental whitespace from each element
pub fn decode_job_types(raw: &str) -> serde_json::Result<Vec<String>> {
    let types: Vec<String> = serde_json::from_str(raw)?;
    Ok(types.into_iter().map(|t| t.trim().to_string()).collect())
}

pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn page_file(&self, page: u32) -> PathBuf {
        self.dir.join(format!("pg{}.csv", page))
    }

    /// Write one page's listings to its page file
    pub fn persist(&self, page: &PageResult) -> Result<PathBuf, EtlError> {
        fs::create_dir_all(&self.dir).map_err(|err| EtlError::persistence(&self.dir, err))?;

        let path = self.page_file(page.page_number);
        let mut writer =
            csv::Writer::from_path(&path).map_err(|err| EtlError::persistence(&path, err))?;

        for listing in &page.listings {
            writer
                .serialize(PageRow::from(listing))
                .map_err(|err| EtlError::persistence(&path, err))?;
        }
        writer
            .flush()
            .map_err(|err| EtlError::persistence(&path, err))?;

        info!(page = page.page_number, file = %path.display(), "Saved data in a csv file");
        Ok(path)
    }

    /// All page files present in the directory, sorted by page number.
    ///
    /// Sorting is numeric, not lexicographic: pg10 comes after pg9, which the
    /// merge pass relies on for deterministic id assignment.
    pub fn page_files(&self) -> Result<Vec<(u32, PathBuf)>, EtlError> {
        let entries =
            fs::read_dir(&self.dir).map_err(|err| EtlError::persistence(&self.dir, err))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| EtlError::persistence(&self.dir, err))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(page) = parse_page_number(name) {
                files.push((page, entry.path()));
            }
        }

        files.sort_by_key(|(page, _)| *page);
        Ok(files)
    }
}

fn parse_page_number(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix("pg")?
        .strip_suffix(".csv")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, types: &[&str]) -> JobListing {
        JobListing {
            title: title.to_string(),
            company: "Acme Corp".to_string(),
            location: "Berlin, Germany".to_string(),
            job_types: types.iter().map(|t| t.to_string()).collect(),
            posted_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            posted_display: "01 August 2026".to_string(),
            category: "Engineering".to_string(),
            apply_url: "https://www.python.org/jobs/1/".to_string(),
        }
    }

    #[test]
    fn test_job_type_roundtrip() {
        for types in [
            vec![],
            vec!["Full-time".to_string()],
            vec!["Full-time".to_string(), "Remote".to_string()],
        ] {
            let decoded = decode_job_types(&encode_job_types(&types)).unwrap();
            assert_eq!(decoded, types);
        }
    }

    #[test]
    fn test_decode_trims_whitespace() {
        let decoded = decode_job_types("[\" Full-time \", \"Remote\"]").unwrap();
        assert_eq!(decoded, vec!["Full-time", "Remote"]);
    }

    #[test]
    fn test_decode_rejects_non_list_input() {
        assert!(decode_job_types("Full-time, Remote").is_err());
        assert!(decode_job_types("{\"a\": 1}").is_err());
    }

    #[test]
    fn test_persist_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path().to_path_buf());

        let path = store
            .persist(&PageResult {
                page_number: 1,
                listings: vec![listing("Engineer", &["Full-time", "Remote"])],
            })
            .unwrap();

        let content = fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "job_title,company_name,location,job_type,posted_date,job_category,job_apply_full_link"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("Engineer,Acme Corp,"));
        assert!(row.contains("2026-08-01"));
    }

    #[test]
    fn test_persist_is_idempotent_about_directory_creation() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path().join("csvs"));
        let page = PageResult {
            page_number: 1,
            listings: vec![listing("Engineer", &[])],
        };

        store.persist(&page).unwrap();
        store.persist(&page).unwrap();
    }

    #[test]
    fn test_page_files_sorted_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path().to_path_buf());

        for page in [10, 2, 1] {
            store
                .persist(&PageResult {
                    page_number: page,
                    listings: vec![listing("Engineer", &[])],
                })
                .unwrap();
        }
        // Non-page files in the directory are ignored
        fs::write(dir.path().join("merged_jobs.csv"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let pages: Vec<u32> = store.page_files().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(pages, vec![1, 2, 10]);
    }
}
