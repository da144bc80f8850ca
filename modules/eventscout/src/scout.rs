//! One end-to-end update cycle.
//!
//! load → staleness filter → for each query: discover → for each candidate:
//! link check → verify (then pause) → merge → save.
//!
//! Strictly sequential. Only the final save can fail the run; every other
//! failure costs the query or candidate it happened in and nothing more.

use std::sync::Arc;
use std::time::Duration;

use ai_client::Completion;
use anyhow::Result;
use chrono::Utc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use eventscout_common::{Event, ExtractedEvent, FileConfig, ScoutError};

use crate::catalog::CatalogStore;
use crate::discovery::{CandidateDiscovery, GoogleSearch};
use crate::link_validator::{HttpLinkChecker, LinkValidator};
use crate::reconcile::{merge, next_id, StalenessFilter};
use crate::stats::RunStats;
use crate::verifier::{EventVerifier, SemanticVerifier, VerificationPrompt};

/// Result of a completed run: the catalog as saved, plus counters.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub catalog: Vec<Event>,
    pub stats: RunStats,
}

pub struct Scout {
    queries: Vec<String>,
    discovery: CandidateDiscovery,
    links: LinkValidator,
    verifier: Arc<dyn EventVerifier>,
    store: Arc<dyn CatalogStore>,
    staleness: StalenessFilter,
    verify_delay: Duration,
}

impl Scout {
    pub fn new(
        queries: Vec<String>,
        discovery: CandidateDiscovery,
        links: LinkValidator,
        verifier: Arc<dyn EventVerifier>,
        store: Arc<dyn CatalogStore>,
        staleness: StalenessFilter,
        verify_delay: Duration,
    ) -> Self {
        Self {
            queries,
            discovery,
            links,
            verifier,
            store,
            staleness,
            verify_delay,
        }
    }

    /// Wire the production collaborators: Google results pages, HTTP link
    /// checks, and the given completion provider.
    pub fn from_config(
        config: &FileConfig,
        ai: Arc<dyn Completion>,
        store: Arc<dyn CatalogStore>,
    ) -> Result<Self> {
        let search = Arc::new(GoogleSearch::new(&config.search)?);
        let checker = Arc::new(HttpLinkChecker::new(config.links.timeout())?);
        let prompt = VerificationPrompt::new(
            &config.identity.locality,
            &config.identity.future_cutoff,
        );

        Ok(Self::new(
            config.search.queries.clone(),
            CandidateDiscovery::from_config(search, &config.search),
            LinkValidator::new(checker),
            Arc::new(SemanticVerifier::new(ai, prompt)),
            store,
            StalenessFilter::from_config(&config.catalog),
            config.verification.delay(),
        ))
    }

    pub async fn run(&self) -> Result<RunReport, ScoutError> {
        let run_id = Uuid::new_v4();
        self.run_inner()
            .instrument(info_span!("event_update", %run_id))
            .await
    }

    async fn run_inner(&self) -> Result<RunReport, ScoutError> {
        let mut stats = RunStats::new(Utc::now());
        info!(queries = self.queries.len(), "Starting event update");

        let loaded = self.store.load().await;
        stats.events_loaded = loaded.len() as u32;
        let first_id = next_id(&loaded);

        let (existing, stale) = self.staleness.retain_relevant(loaded);
        stats.stale_removed = stale as u32;
        info!(kept = existing.len(), removed = stale, "Removed past events");

        let verified = self.collect_verified(&mut stats).await;

        // New events must pass the same date check as the catalog they join.
        let (verified, stale_new): (Vec<ExtractedEvent>, Vec<ExtractedEvent>) = verified
            .into_iter()
            .partition(|e| self.staleness.is_relevant_date(&e.date));
        if !stale_new.is_empty() {
            info!(count = stale_new.len(), "Dropped verified events with past dates");
            stats.stale_removed += stale_new.len() as u32;
        }

        let outcome = merge(existing, verified, first_id);
        stats.events_added = outcome.added as u32;
        stats.duplicates_dropped = outcome.duplicates_dropped as u32;
        stats.catalog_size = outcome.catalog.len() as u32;
        info!(
            added = outcome.added,
            duplicates = outcome.duplicates_dropped,
            total = outcome.catalog.len(),
            "Merged catalog"
        );

        self.store
            .save(&outcome.catalog)
            .await
            .map_err(|e| ScoutError::Persistence(format!("{e:#}")))?;

        Ok(RunReport {
            catalog: outcome.catalog,
            stats,
        })
    }

    /// Discover and verify across every query, in order.
    async fn collect_verified(&self, stats: &mut RunStats) -> Vec<ExtractedEvent> {
        let mut verified = Vec::new();

        for query in &self.queries {
            stats.queries_searched += 1;
            let candidates = self.discovery.discover(query).await;
            if candidates.is_empty() {
                stats.queries_empty += 1;
                continue;
            }
            stats.candidates_found += candidates.len() as u32;

            for candidate in candidates {
                info!(
                    title = candidate.title.as_str(),
                    link = candidate.link.as_str(),
                    "Processing candidate"
                );

                if !self.links.is_live(&candidate.link).await {
                    info!(link = candidate.link.as_str(), "Dead link, skipping");
                    stats.dead_links += 1;
                    continue;
                }

                stats.verification_attempts += 1;
                match self.verifier.verify(&candidate).await {
                    Some(event) => {
                        stats.events_verified += 1;
                        verified.push(event);
                    }
                    None => stats.events_rejected += 1,
                }

                if !self.verify_delay.is_zero() {
                    tokio::time::sleep(self.verify_delay).await;
                }
            }
        }

        info!(count = verified.len(), "Verified new events");
        verified
    }
}
