// src/scrape/paginator.rs
//! Pagination driver.
//!
//! Walks listing pages strictly sequentially from the start page, emitting
//! one `PageResult` per page to the sink. After each successful page it
//! probes the next page's URL (status only) and stops on the first miss, so
//! a run over N pages costs N content fetches plus one probe per transition
//! with exactly one wasted fetch at the end. The walk is an explicit state
//! machine rather than recursion into the next page, so stack depth stays
//! constant no matter how many pages exist.

use tracing::{error, info};

use super::{parser, PageFetcher, PageResult, ScrapeSummary};
use crate::config::EtlConfig;
use crate::error::EtlError;

enum DriverState {
    Fetching(u32),
    Probing(u32),
    Done,
}

pub struct Paginator<'a> {
    fetcher: &'a PageFetcher,
    config: &'a EtlConfig,
}

impl<'a> Paginator<'a> {
    pub fn new(fetcher: &'a PageFetcher, config: &'a EtlConfig) -> Self {
        Self { fetcher, config }
    }

    /// Drive fetch → parse → sink from `start_page` until the first page
    /// that does not exist. A fetch or parse failure on a primary page stops
    /// the run with the error; earlier pages have already reached the sink.
    pub async fn run<F>(&self, start_page: u32, mut sink: F) -> Result<ScrapeSummary, EtlError>
    where
        F: FnMut(PageResult) -> Result<(), EtlError>,
    {
        let mut summary = ScrapeSummary::default();
        let mut state = DriverState::Fetching(start_page);

        loop {
            state = match state {
                DriverState::Fetching(page) => {
                    let url = self.config.page_url(page);
                    info!(page, url = %url, "Extracting data for page");

                    let Some(body) = self.fetcher.fetch(&url).await else {
                        error!(page, url = %url, "Primary content fetch failed, stopping run");
                        return Err(EtlError::transport(url, "primary content fetch failed"));
                    };

                    let listings = parser::parse_listings(&body, page, &self.config.origin)?;
                    info!(page, listings = listings.len(), "Parsed listing page");

                    summary.pages += 1;
                    summary.listings += listings.len();
                    sink(PageResult {
                        page_number: page,
                        listings,
                    })?;

                    DriverState::Probing(page + 1)
                }
                DriverState::Probing(page) => {
                    info!(page, "Checking the existence of next page");
                    if self.fetcher.probe(&self.config.page_url(page)).await {
                        DriverState::Fetching(page)
                    } else {
                        info!(page, "Page does not exist, ending the search");
                        DriverState::Done
                    }
                }
                DriverState::Done => break,
            };
        }

        Ok(summary)
    }
}
