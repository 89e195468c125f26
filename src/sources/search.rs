// file: src/sources/search.rs
// description: Google Custom Search client producing candidate links
// reference: https://developers.google.com/custom-search/v1/reference/rest/v1/cse/list

use crate::config::{SearchConfig, SearchCredentials};
use crate::error::{PipelineError, Result};
use crate::sources::SearchClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// The API serves at most ten results per request.
const PAGE_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

pub struct GoogleSearchClient {
    client: Client,
    config: SearchConfig,
    credentials: SearchCredentials,
}

impl GoogleSearchClient {
    pub fn new(config: SearchConfig, credentials: SearchCredentials) -> Self {
        Self {
            client: Client::new(),
            config,
            credentials,
        }
    }

    async fn fetch_page(&self, query: &str, start: usize) -> Result<Vec<String>> {
        let start_param = start.to_string();
        let num_param = PAGE_SIZE.to_string();

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("q", query),
                ("key", self.credentials.api_key.as_str()),
                ("cx", self.credentials.cse_id.as_str()),
                ("num", num_param.as_str()),
                ("start", start_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::Search(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Search(format!(
                "search request failed with status {}: {}",
                status, error_text
            )));
        }

        let page: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Search(format!("failed to parse response: {}", e)))?;

        Ok(page.items.into_iter().map(|item| item.link).collect())
    }
}

/// Appends unseen links in order; returns `false` once `limit` links are held.
fn absorb_page(
    links: &mut Vec<String>,
    seen: &mut HashSet<String>,
    page: Vec<String>,
    limit: usize,
) -> bool {
    for link in page {
        if links.len() >= limit {
            return false;
        }
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }
    links.len() < limit
}

#[async_trait]
impl SearchClient for GoogleSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let query = self.config.render_query(query);
        info!("Searching for: {}", query);

        let mut links = Vec::new();
        let mut seen = HashSet::new();

        for start in (1..=self.config.num_results).step_by(PAGE_SIZE) {
            let page = match self.fetch_page(&query, start).await {
                Ok(page) => page,
                Err(e) if start == 1 => return Err(e),
                Err(e) => {
                    warn!("Stopping pagination at result {}: {}", start, e);
                    break;
                }
            };

            debug!("Search page starting at {} returned {} links", start, page.len());
            if page.is_empty() {
                break;
            }

            if !absorb_page(&mut links, &mut seen, page, self.config.num_results) {
                break;
            }
        }

        info!("Search returned {} unique links", links.len());
        Ok(links)
    }
}
