// src/scrape/fetcher.rs
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

/// Thin wrapper around one HTTP client for listing-page requests.
///
/// Both methods treat any transport error or non-2xx status as a plain
/// "no" — they log and report failure instead of raising, because a failed
/// request is conclusive for that URL at that moment (no retry layer).
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch a page body; `None` on any transport error or non-success status
    pub async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                error!(url, error = %err, "Request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            error!(url, status = %response.status(), "Request returned non-success status");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(err) => {
                error!(url, error = %err, "Failed to read response body");
                None
            }
        }
    }

    /// Existence check: status only, body discarded
    pub async fn probe(&self, url: &str) -> bool {
        debug!(url, "Probing for page existence");
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                info!(url, error = %err, "Probe request failed");
                false
            }
        }
    }
}
