//! Link liveness: a header-only probe first, a full fetch when that fails or
//! is inconclusive. Only a 2xx status counts as live.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

/// Performs a single request against a URL and reports the final status code
/// (after redirects).
#[async_trait]
pub trait LinkChecker: Send + Sync {
    async fn probe(&self, url: &str, method: ProbeMethod) -> Result<u16>;
}

pub struct HttpLinkChecker {
    client: reqwest::Client,
}

impl HttpLinkChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to build link-check HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LinkChecker for HttpLinkChecker {
    async fn probe(&self, url: &str, method: ProbeMethod) -> Result<u16> {
        let request = match method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::Get => self.client.get(url),
        };
        let resp = request.send().await?;
        Ok(resp.status().as_u16())
    }
}

pub struct LinkValidator {
    checker: Arc<dyn LinkChecker>,
}

impl LinkValidator {
    pub fn new(checker: Arc<dyn LinkChecker>) -> Self {
        Self { checker }
    }

    pub async fn is_live(&self, url: &str) -> bool {
        match self.checker.probe(url, ProbeMethod::Head).await {
            Ok(status) if is_success(status) => return true,
            Ok(status) => debug!(url, status, "HEAD inconclusive, falling back to GET"),
            Err(e) => debug!(url, error = %e, "HEAD failed, falling back to GET"),
        }

        match self.checker.probe(url, ProbeMethod::Get).await {
            Ok(status) => {
                debug!(url, status, "GET probe");
                is_success(status)
            }
            Err(e) => {
                debug!(url, error = %e, "GET failed");
                false
            }
        }
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLinkChecker;

    #[tokio::test]
    async fn head_success_skips_get() {
        let checker = Arc::new(MockLinkChecker::new().on_head("https://a.test", 200));
        let validator = LinkValidator::new(checker.clone());

        assert!(validator.is_live("https://a.test").await);
        assert_eq!(checker.probes(), vec![("https://a.test".to_string(), ProbeMethod::Head)]);
    }

    #[tokio::test]
    async fn head_rejected_falls_back_to_get() {
        let checker = Arc::new(
            MockLinkChecker::new()
                .on_head("https://a.test", 405)
                .on_get("https://a.test", 200),
        );
        let validator = LinkValidator::new(checker.clone());

        assert!(validator.is_live("https://a.test").await);
        assert_eq!(checker.probes().len(), 2);
    }

    #[tokio::test]
    async fn head_error_falls_back_to_get() {
        let checker = Arc::new(MockLinkChecker::new().on_get("https://a.test", 204));
        assert!(LinkValidator::new(checker).is_live("https://a.test").await);
    }

    #[tokio::test]
    async fn both_failing_is_dead() {
        let checker = Arc::new(
            MockLinkChecker::new()
                .on_head("https://a.test", 404)
                .on_get("https://a.test", 404),
        );
        assert!(!LinkValidator::new(checker).is_live("https://a.test").await);

        let unreachable = Arc::new(MockLinkChecker::new());
        assert!(!LinkValidator::new(unreachable).is_live("https://gone.test").await);
    }

    #[tokio::test]
    async fn redirect_status_is_not_success() {
        let checker = Arc::new(
            MockLinkChecker::new()
                .on_head("https://a.test", 301)
                .on_get("https://a.test", 302),
        );
        assert!(!LinkValidator::new(checker).is_live("https://a.test").await);
    }
}
