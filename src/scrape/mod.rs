// src/scrape/mod.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub mod fetcher;
pub mod paginator;
pub mod parser;

pub use fetcher::PageFetcher;
pub use paginator::Paginator;

use crate::config::EtlConfig;
use crate::error::EtlError;
use crate::pages::PageStore;

/// One scraped job posting, pre-normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_types: Vec<String>,
    pub posted_date: NaiveDate,
    /// Human-readable posted date, display-only
    pub posted_display: String,
    pub category: String,
    pub apply_url: String,
}

/// All listings extracted from one listing page, in document order
#[derive(Debug, Clone)]
pub struct PageResult {
    pub page_number: u32,
    pub listings: Vec<JobListing>,
}

/// Totals reported by a pagination run
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrapeSummary {
    pub pages: usize,
    pub listings: usize,
}

/// Run the extract stage: paginate through all listing pages and persist
/// each page as `pg{n}.csv` under the configured pages directory.
pub async fn run_extract(config: &EtlConfig) -> Result<ScrapeSummary, EtlError> {
    let fetcher = PageFetcher::new(config.request_timeout());
    let store = PageStore::new(config.pages_dir.clone());
    let paginator = Paginator::new(&fetcher, config);
    let strict = config.strict_persistence;

    let summary = paginator
        .run(1, |page| match store.persist(&page) {
            Ok(path) => {
                info!(
                    page = page.page_number,
                    listings = page.listings.len(),
                    file = %path.display(),
                    "Saved page data"
                );
                Ok(())
            }
            Err(err) if strict => Err(err),
            Err(err) => {
                warn!(
                    page = page.page_number,
                    error = %err,
                    "Failed to save page data, continuing with next page"
                );
                Ok(())
            }
        })
        .await?;

    info!(
        pages = summary.pages,
        listings = summary.listings,
        "Overall search completed"
    );
    Ok(summary)
}
