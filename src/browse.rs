// src/browse.rs
//! Interactive, filtered console view of the live listings.
//!
//! Prompts once for a location substring and a recency window, then walks
//! the same pagination as the extract stage, printing matching listings as
//! human-readable blocks instead of persisting anything.

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use console::style;
use dialoguer::{Input, Select};

use crate::config::EtlConfig;
use crate::error::EtlError;
use crate::scrape::{JobListing, PageFetcher, Paginator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostedWithin {
    Day,
    Week,
    Month,
}

impl PostedWithin {
    /// Oldest posted date still inside the window, inclusive
    pub fn threshold(self, today: NaiveDate) -> NaiveDate {
        match self {
            PostedWithin::Day => today,
            PostedWithin::Week => today - Duration::days(7),
            PostedWithin::Month => today - Duration::days(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowseFilters {
    pub location: String,
    pub posted_within: PostedWithin,
}

/// Case-insensitive substring match on the listing's location
pub fn matches_location(listing_location: &str, query: &str) -> bool {
    listing_location
        .to_lowercase()
        .contains(&query.to_lowercase())
}

pub fn matches_recency(posted: NaiveDate, today: NaiveDate, within: PostedWithin) -> bool {
    posted >= within.threshold(today)
}

/// Ask for the location and recency filters on the console
pub fn prompt_filters() -> Result<BrowseFilters> {
    let location: String = Input::new()
        .with_prompt("Enter location you want to work in")
        .allow_empty(true)
        .interact_text()?;

    let choice = Select::new()
        .with_prompt("Posted within")
        .items(&["Day", "Week", "Month"])
        .default(1)
        .interact()?;
    let posted_within = match choice {
        0 => PostedWithin::Day,
        2 => PostedWithin::Month,
        _ => PostedWithin::Week,
    };

    Ok(BrowseFilters {
        location: location.trim().to_string(),
        posted_within,
    })
}

/// Walk all listing pages and print the listings matching the filters
pub async fn run_browse(config: &EtlConfig, filters: &BrowseFilters) -> Result<()> {
    let fetcher = PageFetcher::new(config.request_timeout());
    let paginator = Paginator::new(&fetcher, config);
    let today = Local::now().date_naive();

    let mut total = 0usize;
    let result = paginator
        .run(1, |page| {
            let mut page_count = 0usize;
            for listing in &page.listings {
                if !matches_location(&listing.location, &filters.location) {
                    continue;
                }
                if !matches_recency(listing.posted_date, today, filters.posted_within) {
                    continue;
                }
                page_count += 1;
                total += 1;
                println!(
                    "Details for job {} on page {}:",
                    page_count, page.page_number
                );
                display_listing(listing);
            }

            if page_count == 0 {
                println!(
                    "No jobs found on page {} for given location and date filter.",
                    page.page_number
                );
            } else {
                println!("Total {} jobs found on page {}.", page_count, page.page_number);
            }
            println!();
            Ok(())
        })
        .await;

    match result {
        Ok(_) => {
            println!("Search completed. {} matching jobs in total.", total);
            Ok(())
        }
        Err(EtlError::Transport { url, .. }) => {
            println!("Request for {} failed. Ending the search.", url);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn display_listing(listing: &JobListing) {
    let locations = listing
        .location
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ");

    println!("{}", style("Job Info").bold());
    println!("Title         : {}", listing.title);
    println!("Company name  : {}", listing.company);
    println!("Locations     : {}", locations);
    println!("Date posted   : {}", listing.posted_display);
    println!("Apply link    : {}", listing.apply_url);
    println!("{}", "-".repeat(40));
}
