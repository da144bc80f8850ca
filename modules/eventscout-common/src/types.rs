use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// --- Candidate ---

/// A raw search hit that survived the domain allowlist, before any liveness
/// or semantic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub link: String,
    pub snippet: String,
    /// The seed query that produced this hit.
    pub query: String,
}

// --- Category ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    Concerts,
    Arts,
    Christmas,
    Food,
    Family,
    Workshops,
    Festivals,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Concerts,
        Category::Arts,
        Category::Christmas,
        Category::Food,
        Category::Family,
        Category::Workshops,
        Category::Festivals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Concerts => "concerts",
            Category::Arts => "arts",
            Category::Christmas => "christmas",
            Category::Food => "food",
            Category::Family => "family",
            Category::Workshops => "workshops",
            Category::Festivals => "festivals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("unknown category: {s:?}"))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// --- ExtractedEvent ---

/// An event as structured by the verification service, not yet part of the
/// catalog (no id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub title: String,
    pub date: String,
    pub category: Category,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    pub venue: String,
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub emoji: String,
}

impl ExtractedEvent {
    pub fn into_event(self, id: u64) -> Event {
        Event {
            id,
            title: self.title,
            date: self.date,
            category: self.category,
            price: self.price,
            venue: self.venue,
            description: self.description,
            link: self.link,
            emoji: self.emoji,
        }
    }
}

// --- Event ---

/// A verified event as persisted in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub date: String,
    pub category: Category,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    pub venue: String,
    #[serde(default)]
    pub description: String,
    pub link: String,
    #[serde(default)]
    pub emoji: String,
}

impl Event {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.title, &self.venue)
    }
}

/// Logical identity of an event: case-insensitive `(title, venue)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String, String);

impl DedupKey {
    pub fn new(title: &str, venue: &str) -> Self {
        Self(title.to_lowercase(), venue.to_lowercase())
    }
}

// --- Price parsing ---

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Number(f64),
    Text(String),
}

/// Parse a price the way the verification service tends to emit it: a bare
/// number, a numeric string with a currency prefix, or "free".
pub fn parse_price(raw: &str) -> Option<f64> {
    let text = raw.trim().to_lowercase();
    if text == "free" {
        return Some(0.0);
    }
    let numeric = text
        .trim_start_matches(|c: char| c.is_alphabetic() || c == '$' || c.is_whitespace())
        .replace(',', "");
    numeric.parse::<f64>().ok().filter(|p| valid_price(*p))
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = match PriceRepr::deserialize(deserializer)? {
        PriceRepr::Number(n) if valid_price(n) => Some(n),
        PriceRepr::Number(_) => None,
        PriceRepr::Text(s) => parse_price(&s),
    };
    price.ok_or_else(|| serde::de::Error::custom("price must be a non-negative number or \"free\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Concerts".parse::<Category>(), Ok(Category::Concerts));
        assert_eq!(" festivals ".parse::<Category>(), Ok(Category::Festivals));
        assert!("sports".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Workshops).unwrap(), "\"workshops\"");
        let parsed: Category = serde_json::from_str("\"Christmas\"").unwrap();
        assert_eq!(parsed, Category::Christmas);
    }

    #[test]
    fn price_accepts_numbers_strings_and_free() {
        assert_eq!(parse_price("Free"), Some(0.0));
        assert_eq!(parse_price("S$25"), Some(25.0));
        assert_eq!(parse_price("$1,200.50"), Some(1200.5));
        assert_eq!(parse_price("38"), Some(38.0));
        assert_eq!(parse_price("-5"), None);
        assert_eq!(parse_price("varies"), None);
    }

    #[test]
    fn blank_price_is_not_free() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("   "), None);
        for price in [r#""""#, r#""  ""#] {
            let json = format!(
                r#"{{"title":"t","date":"Daily","category":"food","price":{price},"venue":"v","description":"d"}}"#
            );
            assert!(serde_json::from_str::<ExtractedEvent>(&json).is_err(), "accepted {price}");
        }
    }

    #[test]
    fn negative_numeric_price_is_rejected() {
        let json = r#"{"title":"t","date":"Daily","category":"food","price":-1,"venue":"v","description":"d"}"#;
        assert!(serde_json::from_str::<ExtractedEvent>(json).is_err());
    }

    #[test]
    fn extracted_event_defaults_link_and_emoji() {
        let json = r#"{"title":"Jazz Night","date":"13 Dec","category":"concerts","price":"free","venue":"Esplanade","description":"Live jazz."}"#;
        let event: ExtractedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.price, 0.0);
        assert!(event.link.is_empty());
        assert!(event.emoji.is_empty());

        let event = event.into_event(7);
        assert_eq!(event.id, 7);
        assert_eq!(event.price, 0.0);
    }

    #[test]
    fn dedup_key_ignores_case() {
        assert_eq!(
            DedupKey::new("Glow Festival", "Gardens"),
            DedupKey::new("GLOW FESTIVAL", "gardens")
        );
        assert_ne!(
            DedupKey::new("Glow", "Festival Gardens"),
            DedupKey::new("Glow Festival", "Gardens")
        );
    }
}
