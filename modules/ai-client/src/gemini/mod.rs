mod client;
pub(crate) mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AiError, Result};
use crate::traits::Completion;

use client::GeminiClient;
use types::GenerateRequest;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

// =============================================================================
// Gemini Agent
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    model: String,
    base_url: Option<String>,
    timeout: Duration,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> Result<GeminiClient> {
        let client = GeminiClient::new(&self.api_key, self.timeout)?;
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    pub async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let request = GenerateRequest::new(system, user);
        let response = self.client()?.generate(&self.model, &request).await?;

        response.text().ok_or(AiError::EmptyResponse("Gemini"))
    }
}

#[async_trait]
impl Completion for Gemini {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.generate(system, user).await
    }

    fn provider(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_new() {
        let ai = Gemini::new("AIza-test", DEFAULT_MODEL);
        assert_eq!(ai.model(), DEFAULT_MODEL);
        assert_eq!(ai.api_key, "AIza-test");
        assert!(ai.base_url.is_none());
    }

    #[test]
    fn test_gemini_with_timeout() {
        let ai = Gemini::new("AIza-test", DEFAULT_MODEL).with_timeout(Duration::from_secs(5));
        assert_eq!(ai.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let ai = Gemini::new("AIza-test", DEFAULT_MODEL)
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let err = ai.complete("system", "user").await.unwrap_err();
        assert!(matches!(err, AiError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn network_errors_never_carry_the_key() {
        let ai = Gemini::new("AIzaSECRETKEY123", DEFAULT_MODEL)
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let err = ai.complete("system", "user").await.unwrap_err();
        assert!(!err.to_string().contains("AIzaSECRETKEY123"), "leaked: {err}");
        assert!(!format!("{err:?}").contains("AIzaSECRETKEY123"));
    }
}
