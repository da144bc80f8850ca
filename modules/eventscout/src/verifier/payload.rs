//! The verification service's reply: `{is_valid, event, reasoning}`, possibly
//! wrapped in a markdown fence.

use ai_client::strip_code_blocks;
use serde::Deserialize;

use eventscout_common::{Candidate, ExtractedEvent};

#[derive(Debug, Deserialize)]
struct VerificationPayload {
    is_valid: bool,
    #[serde(default)]
    event: Option<serde_json::Value>,
    #[serde(default)]
    reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(ExtractedEvent),
    Rejected { reason: String },
}

/// Interpret a raw reply for `candidate`.
///
/// Anything that does not parse, or claims validity without a usable event,
/// is a rejection. `reasoning` is only ever carried into the rejection reason.
pub fn parse_verdict(raw: &str, candidate: &Candidate) -> Verdict {
    let payload: VerificationPayload = match serde_json::from_str(strip_code_blocks(raw)) {
        Ok(p) => p,
        Err(e) => {
            return Verdict::Rejected {
                reason: format!("unparseable response: {e}"),
            }
        }
    };

    if !payload.is_valid {
        return Verdict::Rejected {
            reason: payload
                .reasoning
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "marked invalid".to_string()),
        };
    }

    let Some(value) = payload.event else {
        return Verdict::Rejected {
            reason: "valid verdict without an event".to_string(),
        };
    };

    let mut event: ExtractedEvent = match serde_json::from_value(value) {
        Ok(e) => e,
        Err(e) => {
            return Verdict::Rejected {
                reason: format!("malformed event: {e}"),
            }
        }
    };

    if let Some(missing) = missing_field(&event) {
        return Verdict::Rejected {
            reason: format!("event has no {missing}"),
        };
    }

    event.link = candidate.link.clone();
    Verdict::Accepted(event)
}

fn missing_field(event: &ExtractedEvent) -> Option<&'static str> {
    [
        ("title", &event.title),
        ("date", &event.date),
        ("venue", &event.venue),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventscout_common::Category;

    fn candidate() -> Candidate {
        Candidate {
            title: "Glow at the Gardens".into(),
            link: "https://www.gardensbythebay.com.sg/glow".into(),
            snippet: "Light installations every night".into(),
            query: "Singapore festivals upcoming".into(),
        }
    }

    const VALID: &str = r#"{
        "is_valid": true,
        "event": {
            "title": "Glow Festival",
            "date": "Daily",
            "category": "festivals",
            "price": 0,
            "venue": "Gardens",
            "description": "Nightly light installations across the gardens.",
            "link": "https://www.gardensbythebay.com.sg/glow",
            "emoji": "✨"
        },
        "reasoning": "Real recurring event with clear venue."
    }"#;

    #[test]
    fn accepts_fenced_valid_payload() {
        let raw = format!("```json\n{VALID}\n```");
        let Verdict::Accepted(event) = parse_verdict(&raw, &candidate()) else {
            panic!("expected acceptance");
        };
        assert_eq!(event.title, "Glow Festival");
        assert_eq!(event.category, Category::Festivals);
        assert_eq!(event.price, 0.0);
        assert_eq!(event.emoji, "✨");
    }

    #[test]
    fn link_is_always_the_candidates() {
        let raw = VALID.replace(
            r#""link": "https://www.gardensbythebay.com.sg/glow""#,
            r#""link": "https://tracker.example.com/redirect""#,
        );
        assert!(raw.contains("tracker.example.com"));
        let Verdict::Accepted(event) = parse_verdict(&raw, &candidate()) else {
            panic!("expected acceptance");
        };
        assert_eq!(event.link, candidate().link);
    }

    #[test]
    fn invalid_payload_is_rejected_with_reasoning() {
        let raw = r#"{"is_valid": false, "reasoning": "Event ended in 2023"}"#;
        assert_eq!(
            parse_verdict(raw, &candidate()),
            Verdict::Rejected {
                reason: "Event ended in 2023".into()
            }
        );
    }

    #[test]
    fn invalid_payload_with_garbage_event_is_still_a_rejection() {
        let raw = r#"{"is_valid": false, "event": {"title": 42}, "reasoning": "not in Singapore"}"#;
        assert!(matches!(parse_verdict(raw, &candidate()), Verdict::Rejected { .. }));
    }

    #[test]
    fn prose_is_rejected() {
        let verdict = parse_verdict("I'm sorry, I can't help with that.", &candidate());
        assert!(matches!(verdict, Verdict::Rejected { ref reason } if reason.starts_with("unparseable")));
    }

    #[test]
    fn valid_without_event_is_rejected() {
        let verdict = parse_verdict(r#"{"is_valid": true}"#, &candidate());
        assert!(matches!(verdict, Verdict::Rejected { .. }));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let raw = VALID.replace("\"festivals\"", "\"sports\"");
        assert!(matches!(parse_verdict(&raw, &candidate()), Verdict::Rejected { .. }));
    }

    #[test]
    fn blank_venue_is_rejected() {
        let raw = VALID.replace("\"Gardens\"", "\"  \"");
        assert_eq!(
            parse_verdict(&raw, &candidate()),
            Verdict::Rejected {
                reason: "event has no venue".into()
            }
        );
    }

    #[test]
    fn blank_price_is_rejected() {
        let raw = VALID.replace("\"price\": 0", "\"price\": \"\"");
        assert!(raw.contains("\"price\": \"\""));
        let verdict = parse_verdict(&raw, &candidate());
        assert!(matches!(verdict, Verdict::Rejected { ref reason } if reason.starts_with("malformed event")));
    }
}
