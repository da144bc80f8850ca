//! Catalog reconciliation: pure transformations over event sequences.
//!
//! - staleness filter: keyword heuristic over free-text dates
//! - dedup: first-seen wins per case-insensitive (title, venue)
//! - merge: survivors first, new events after, ids continue past the max

use std::collections::HashSet;

use eventscout_common::config::CatalogConfig;
use eventscout_common::{Event, ExtractedEvent, UnrecognizedDates};

// ---------------------------------------------------------------------------
// Staleness
// ---------------------------------------------------------------------------

/// Decides whether an event's date text still points at the future. This is a
/// substring check, not calendar arithmetic: "Daily", "Weekends", "until 3 Jan"
/// and anything naming a forward month are relevant.
#[derive(Debug, Clone)]
pub struct StalenessFilter {
    recurrence_markers: Vec<String>,
    forward_months: Vec<String>,
    unrecognized: UnrecognizedDates,
}

impl StalenessFilter {
    pub fn new<I, S>(recurrence_markers: I, forward_months: I, unrecognized: UnrecognizedDates) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        fn lower<I: IntoIterator<Item = S>, S: AsRef<str>>(words: I) -> Vec<String> {
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        }

        Self {
            recurrence_markers: lower(recurrence_markers),
            forward_months: lower(forward_months),
            unrecognized,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            config.recurrence_markers.iter(),
            config.forward_months.iter(),
            config.unrecognized_dates,
        )
    }

    pub fn is_relevant(&self, event: &Event) -> bool {
        self.is_relevant_date(&event.date)
    }

    pub fn is_relevant_date(&self, date: &str) -> bool {
        let date = date.to_lowercase();
        let mentions = |words: &[String]| words.iter().any(|w| date.contains(w.as_str()));

        if mentions(&self.recurrence_markers) || mentions(&self.forward_months) {
            return true;
        }
        self.unrecognized == UnrecognizedDates::Retain && !self.recognizes_any_month(&date)
    }

    /// Keep relevant events in order; returns the survivors and how many
    /// were dropped.
    pub fn retain_relevant(&self, events: Vec<Event>) -> (Vec<Event>, usize) {
        let before = events.len();
        let kept: Vec<Event> = events.into_iter().filter(|e| self.is_relevant(e)).collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }

    /// True when the text names any calendar month at all, forward or not.
    /// Under `Retain`, a date naming a past month is still recognised and
    /// dropped; only text with no month at all is "unrecognised".
    fn recognizes_any_month(&self, lowered: &str) -> bool {
        const MONTHS: [&str; 12] = [
            "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
        ];
        MONTHS.iter().any(|m| lowered.contains(m))
    }
}

// ---------------------------------------------------------------------------
// Dedup
// ---------------------------------------------------------------------------

/// Keep the first event per dedup key, in input order.
pub fn deduplicate(events: Vec<Event>) -> Vec<Event> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|e| seen.insert(e.dedup_key()))
        .collect()
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// The id the next new event should get: one past the largest id in `events`.
pub fn next_id(events: &[Event]) -> u64 {
    events.iter().map(|e| e.id).max().map_or(1, |max| max + 1)
}

/// Give verified events consecutive ids starting at `first_id`, in order.
pub fn assign_ids(verified: Vec<ExtractedEvent>, first_id: u64) -> Vec<Event> {
    verified
        .into_iter()
        .zip(first_id..)
        .map(|(event, id)| event.into_event(id))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub catalog: Vec<Event>,
    pub added: usize,
    pub duplicates_dropped: usize,
}

/// Append newly verified events (ids from `first_id`) to the already
/// staleness-filtered catalog and dedup the whole sequence. Existing events
/// keep their ids and win over new events with the same key. `first_id` must
/// be past every existing id (see [`next_id`]).
pub fn merge(existing: Vec<Event>, verified: Vec<ExtractedEvent>, first_id: u64) -> MergeOutcome {
    let new_ids = first_id..first_id + verified.len() as u64;

    let mut combined = existing;
    combined.extend(assign_ids(verified, first_id));
    let combined_len = combined.len();

    let catalog = deduplicate(combined);
    let duplicates_dropped = combined_len - catalog.len();
    let added = catalog.iter().filter(|e| new_ids.contains(&e.id)).count();

    MergeOutcome {
        catalog,
        added,
        duplicates_dropped,
    }
}
