// Test mocks for the update pipeline.
//
// One mock per collaborator boundary:
// - MockSearch (SearchTransport): query → results page HTML
// - MockLinkChecker (LinkChecker): (url, method) → status code
// - MockCompletion (ai_client::Completion): link in prompt → reply text
// - MemoryCatalogStore (CatalogStore): in-memory catalog, optional save failure
//
// Plus builders for Candidate, Event, ExtractedEvent and canned replies.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use ai_client::{AiError, Completion};
use anyhow::{bail, Result};
use async_trait::async_trait;

use eventscout_common::{Candidate, Category, Event, ExtractedEvent};

use crate::catalog::CatalogStore;
use crate::discovery::SearchTransport;
use crate::link_validator::{LinkChecker, ProbeMethod};

// ---------------------------------------------------------------------------
// MockSearch
// ---------------------------------------------------------------------------

/// Returns `Err` for unregistered or failed queries.
pub struct MockSearch {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_query(mut self, query: &str, page: &str) -> Self {
        self.pages.insert(query.to_string(), page.to_string());
        self
    }

    pub fn fail_query(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchTransport for MockSearch {
    async fn fetch_results(&self, query: &str) -> Result<String> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.failing.contains(query) {
            bail!("MockSearch: simulated failure for {query}");
        }
        match self.pages.get(query) {
            Some(page) => Ok(page.clone()),
            None => bail!("MockSearch: no page registered for {query}"),
        }
    }
}

/// A results page with one `div.g` block per `(title, link)`.
pub fn results_page(hits: &[(&str, &str)]) -> String {
    let blocks: Vec<String> = hits
        .iter()
        .map(|(title, link)| {
            format!(
                r#"<div class="g"><a href="{link}"><h3>{title}</h3></a><div class="VwiC3b">{title} in Singapore</div></div>"#
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", blocks.join("\n"))
}

// ---------------------------------------------------------------------------
// MockLinkChecker
// ---------------------------------------------------------------------------

/// Unregistered (url, method) pairs fail like an unreachable host.
pub struct MockLinkChecker {
    statuses: HashMap<(String, ProbeMethod), u16>,
    live: HashSet<String>,
    probes: Mutex<Vec<(String, ProbeMethod)>>,
}

impl MockLinkChecker {
    pub fn new() -> Self {
        Self {
            statuses: HashMap::new(),
            live: HashSet::new(),
            probes: Mutex::new(Vec::new()),
        }
    }

    pub fn on_head(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert((url.to_string(), ProbeMethod::Head), status);
        self
    }

    pub fn on_get(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert((url.to_string(), ProbeMethod::Get), status);
        self
    }

    /// Every probe of `url` answers 200.
    pub fn live(mut self, url: &str) -> Self {
        self.live.insert(url.to_string());
        self
    }

    pub fn probes(&self) -> Vec<(String, ProbeMethod)> {
        self.probes.lock().unwrap().clone()
    }

    pub fn probed_urls(&self) -> HashSet<String> {
        self.probes().into_iter().map(|(url, _)| url).collect()
    }
}

impl Default for MockLinkChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkChecker for MockLinkChecker {
    async fn probe(&self, url: &str, method: ProbeMethod) -> Result<u16> {
        self.probes.lock().unwrap().push((url.to_string(), method));
        if self.live.contains(url) {
            return Ok(200);
        }
        match self.statuses.get(&(url.to_string(), method)) {
            Some(status) => Ok(*status),
            None => bail!("MockLinkChecker: connection refused for {url}"),
        }
    }
}

// ---------------------------------------------------------------------------
// MockCompletion
// ---------------------------------------------------------------------------

/// Replies keyed by the candidate link found in the user prompt. No match is
/// an API error.
pub struct MockCompletion {
    replies: Vec<(String, String)>,
    failing: HashSet<String>,
    user_prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            replies: Vec::new(),
            failing: HashSet::new(),
            user_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn on_link(mut self, link: &str, reply: &str) -> Self {
        self.replies.push((link.to_string(), reply.to_string()));
        self
    }

    pub fn fail_link(mut self, link: &str) -> Self {
        self.failing.insert(link.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.user_prompts.lock().unwrap().len()
    }

    pub fn user_prompts(&self) -> Vec<String> {
        self.user_prompts.lock().unwrap().clone()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Completion for MockCompletion {
    async fn complete(&self, _system: &str, user: &str) -> ai_client::Result<String> {
        self.user_prompts.lock().unwrap().push(user.to_string());

        let link_line = |link: &str| user.contains(&format!("Link: {link}\n"));
        if self.failing.iter().any(|l| link_line(l)) {
            return Err(AiError::Api {
                status: 503,
                message: "simulated outage".to_string(),
            });
        }
        self.replies
            .iter()
            .find(|(link, _)| link_line(link))
            .map(|(_, reply)| reply.clone())
            .ok_or_else(|| AiError::Network("MockCompletion: no reply registered".to_string()))
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}

/// A fenced, valid verification reply.
pub fn verified_reply(title: &str, venue: &str, date: &str) -> String {
    let payload = serde_json::json!({
        "is_valid": true,
        "event": {
            "title": title,
            "date": date,
            "category": "festivals",
            "price": 0,
            "venue": venue,
            "description": format!("{title} at {venue}."),
            "link": "echoed",
            "emoji": "🎉",
        },
        "reasoning": "clear date and venue",
    });
    format!("```json\n{payload:#}\n```")
}

pub fn rejected_reply(reason: &str) -> String {
    serde_json::json!({ "is_valid": false, "reasoning": reason }).to_string()
}

// ---------------------------------------------------------------------------
// MemoryCatalogStore
// ---------------------------------------------------------------------------

pub struct MemoryCatalogStore {
    events: Mutex<Vec<Event>>,
    fail_saves: bool,
    saves: Mutex<u32>,
}

impl MemoryCatalogStore {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            fail_saves: false,
            saves: Mutex::new(0),
        }
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> u32 {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn load(&self) -> Vec<Event> {
        self.events()
    }

    async fn save(&self, events: &[Event]) -> Result<()> {
        *self.saves.lock().unwrap() += 1;
        if self.fail_saves {
            bail!("MemoryCatalogStore: disk full");
        }
        *self.events.lock().unwrap() = events.to_vec();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn candidate(title: &str, link: &str) -> Candidate {
    Candidate {
        title: title.to_string(),
        link: link.to_string(),
        snippet: format!("{title} snippet"),
        query: "test query".to_string(),
    }
}

pub fn extracted(title: &str, venue: &str, date: &str) -> ExtractedEvent {
    ExtractedEvent {
        title: title.to_string(),
        date: date.to_string(),
        category: Category::Festivals,
        price: 0.0,
        venue: venue.to_string(),
        description: format!("{title} at {venue}."),
        link: format!("https://www.esplanade.com/{}", title.to_lowercase().replace(' ', "-")),
        emoji: String::new(),
    }
}

pub fn event(id: u64, title: &str, venue: &str, date: &str) -> Event {
    extracted(title, venue, date).into_event(id)
}
