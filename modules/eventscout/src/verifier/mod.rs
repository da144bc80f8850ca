//! Semantic verification of candidates against an external reasoning service.
//!
//! The verifier is stateless: one candidate in, one completion call, one
//! verdict out. Transport failures, non-success statuses, timeouts and
//! malformed replies all collapse to "no event" so a bad reply never costs
//! more than the candidate it was about.

pub mod payload;
pub mod prompt;

use std::sync::Arc;

use ai_client::Completion;
use async_trait::async_trait;
use tracing::{info, warn};

use eventscout_common::{Candidate, ExtractedEvent};

pub use payload::{parse_verdict, Verdict};
pub use prompt::VerificationPrompt;

#[async_trait]
pub trait EventVerifier: Send + Sync {
    /// `Some` only for a candidate the service accepted as a real upcoming
    /// event in the target locality.
    async fn verify(&self, candidate: &Candidate) -> Option<ExtractedEvent>;
}

pub struct SemanticVerifier {
    ai: Arc<dyn Completion>,
    prompt: VerificationPrompt,
}

impl SemanticVerifier {
    pub fn new(ai: Arc<dyn Completion>, prompt: VerificationPrompt) -> Self {
        Self { ai, prompt }
    }
}

#[async_trait]
impl EventVerifier for SemanticVerifier {
    async fn verify(&self, candidate: &Candidate) -> Option<ExtractedEvent> {
        let raw = match self
            .ai
            .complete(&self.prompt.system(), &self.prompt.user(candidate))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    link = candidate.link.as_str(),
                    provider = self.ai.provider(),
                    error = %e,
                    "Verification call failed"
                );
                return None;
            }
        };

        match parse_verdict(&raw, candidate) {
            Verdict::Accepted(event) => {
                info!(
                    title = event.title.as_str(),
                    category = %event.category,
                    link = candidate.link.as_str(),
                    "Verified"
                );
                Some(event)
            }
            Verdict::Rejected { reason } => {
                info!(link = candidate.link.as_str(), reason = reason.as_str(), "Rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{candidate, verified_reply, MockCompletion};

    fn verifier(ai: MockCompletion) -> (Arc<MockCompletion>, SemanticVerifier) {
        let ai = Arc::new(ai);
        let verifier = SemanticVerifier::new(
            ai.clone(),
            VerificationPrompt::new("Singapore", "December 2025"),
        );
        (ai, verifier)
    }

    #[tokio::test]
    async fn accepted_reply_yields_event() {
        let c = candidate("Jazz Night", "https://www.esplanade.com/jazz");
        let (ai, verifier) = verifier(
            MockCompletion::new().on_link(&c.link, &verified_reply("Jazz Night", "Esplanade", "13 Dec")),
        );

        let event = verifier.verify(&c).await.expect("accepted");
        assert_eq!(event.venue, "Esplanade");
        assert_eq!(event.link, c.link);
        assert_eq!(ai.calls(), 1);
    }

    #[tokio::test]
    async fn rejection_yields_none() {
        let c = candidate("Old Gig", "https://www.esplanade.com/old");
        let (_, verifier) = verifier(MockCompletion::new().on_link(
            &c.link,
            r#"{"is_valid": false, "reasoning": "past event"}"#,
        ));
        assert!(verifier.verify(&c).await.is_none());
    }

    #[tokio::test]
    async fn service_error_yields_none() {
        let c = candidate("Jazz Night", "https://www.esplanade.com/jazz");
        let (ai, verifier) = verifier(MockCompletion::new().fail_link(&c.link));
        assert!(verifier.verify(&c).await.is_none());
        assert_eq!(ai.calls(), 1);
    }

    #[tokio::test]
    async fn prompt_contains_candidate() {
        let c = candidate("Jazz Night", "https://www.esplanade.com/jazz");
        let (ai, verifier) = verifier(MockCompletion::new());
        verifier.verify(&c).await;
        let prompts = ai.user_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("https://www.esplanade.com/jazz"));
    }
}
