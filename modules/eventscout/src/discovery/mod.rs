//! Candidate discovery: one search per seed query, parsed into hits, filtered
//! to trusted domains and capped.

pub mod domain_filter;
pub mod results_page;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use eventscout_common::config::SearchConfig;
use eventscout_common::Candidate;

pub use domain_filter::DomainAllowlist;
pub use results_page::{parse_results_page, RawHit};

// --- SearchTransport trait ---

/// Issues one search and returns the raw results page.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn fetch_results(&self, query: &str) -> Result<String>;
}

// --- Google results page over HTTP ---

pub struct GoogleSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleSearch {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build search HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SearchTransport for GoogleSearch {
    async fn fetch_results(&self, query: &str) -> Result<String> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .context("Search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Search returned HTTP {status}");
        }

        resp.text().await.context("Failed to read search results page")
    }
}

// --- CandidateDiscovery ---

pub struct CandidateDiscovery {
    transport: Arc<dyn SearchTransport>,
    allowlist: DomainAllowlist,
    max_results: usize,
}

impl CandidateDiscovery {
    pub fn new(
        transport: Arc<dyn SearchTransport>,
        allowlist: DomainAllowlist,
        max_results: usize,
    ) -> Self {
        Self {
            transport,
            allowlist,
            max_results,
        }
    }

    pub fn from_config(transport: Arc<dyn SearchTransport>, config: &SearchConfig) -> Self {
        Self::new(
            transport,
            DomainAllowlist::new(&config.trusted_domains),
            config.max_results,
        )
    }

    /// Search one query. A transport failure is logged and yields no
    /// candidates; it never propagates.
    pub async fn discover(&self, query: &str) -> Vec<Candidate> {
        info!(query, "Searching");

        let page = match self.transport.fetch_results(query).await {
            Ok(page) => page,
            Err(e) => {
                warn!(query, error = %format!("{e:#}"), "Search failed, skipping query");
                return Vec::new();
            }
        };

        let candidates = self.candidates_from_page(query, &page);
        info!(query, count = candidates.len(), "Candidates found");
        candidates
    }

    /// Hits missing a title or link are dropped, then untrusted domains, then
    /// repeated links; the first `max_results` survivors are kept in page order.
    pub fn candidates_from_page(&self, query: &str, page: &str) -> Vec<Candidate> {
        let mut seen_links = HashSet::new();

        parse_results_page(page)
            .into_iter()
            .filter_map(|hit| {
                let (Some(title), Some(link)) = (hit.title, hit.link) else {
                    return None;
                };
                Some(Candidate {
                    title,
                    link,
                    snippet: hit.snippet.unwrap_or_default(),
                    query: query.to_string(),
                })
            })
            .filter(|c| {
                let trusted = self.allowlist.is_trusted(&c.link);
                if !trusted {
                    debug!(link = c.link.as_str(), "Untrusted domain, dropping hit");
                }
                trusted
            })
            .filter(|c| seen_links.insert(c.link.clone()))
            .take(self.max_results)
            .collect()
    }
}
