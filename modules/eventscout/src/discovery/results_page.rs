//! Results-page parsing: raw HTML from the search transport into hits.
//!
//! Each organic result is a `div.g` block holding an `h3` title, an anchor,
//! and an optional `div.VwiC3b` snippet. Blocks missing a piece are still
//! returned; callers decide which fields are required.

use scraper::{ElementRef, Html, Selector};
use url::Url;

const REDIRECT_BASE: &str = "https://www.google.com";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHit {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

/// Parse every result block on the page, in page order.
pub fn parse_results_page(html: &str) -> Vec<RawHit> {
    let document = Html::parse_document(html);
    let result_selector = Selector::parse("div.g").unwrap();
    let title_selector = Selector::parse("h3").unwrap();
    let anchor_selector = Selector::parse("a[href]").unwrap();
    let snippet_selector = Selector::parse("div.VwiC3b").unwrap();

    document
        .select(&result_selector)
        .map(|block| RawHit {
            title: block.select(&title_selector).next().and_then(|e| text_of(&e)),
            link: block
                .select(&anchor_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(resolve_link),
            snippet: block.select(&snippet_selector).next().and_then(|e| text_of(&e)),
        })
        .collect()
}

/// Turn an anchor href into an absolute http(s) URL.
///
/// Google's `/url?q=<target>&sa=...` redirect form is unwrapped to the
/// target. Relative links and other schemes yield `None`.
pub fn resolve_link(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let url = if href.starts_with("/url?") {
        let redirect = Url::parse(&format!("{REDIRECT_BASE}{href}")).ok()?;
        let target = redirect
            .query_pairs()
            .find(|(k, _)| k == "q" || k == "url")
            .map(|(_, v)| v.into_owned())?;
        Url::parse(&target).ok()?
    } else {
        Url::parse(href).ok()?
    };

    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

fn text_of(element: &ElementRef) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="g">
            <a href="https://www.esplanade.com/whats-on/jazz"><h3>Jazz in the City</h3></a>
            <div class="VwiC3b">Free concerts every weekend at the Esplanade.</div>
          </div>
          <div class="g">
            <a href="/url?q=https://www.sentosa.com.sg/en/events/&amp;sa=U&amp;ved=abc"><h3>Sentosa
              Events</h3></a>
          </div>
          <div class="g">
            <div class="VwiC3b">A block with no title or link.</div>
          </div>
          <div class="g">
            <a href="/search?q=more"><h3>Related searches</h3></a>
          </div>
        </body></html>
    "#;

    #[test]
    fn parses_blocks_in_page_order() {
        let hits = parse_results_page(PAGE);
        assert_eq!(hits.len(), 4);

        assert_eq!(hits[0].title.as_deref(), Some("Jazz in the City"));
        assert_eq!(
            hits[0].link.as_deref(),
            Some("https://www.esplanade.com/whats-on/jazz")
        );
        assert_eq!(
            hits[0].snippet.as_deref(),
            Some("Free concerts every weekend at the Esplanade.")
        );

        assert_eq!(hits[1].title.as_deref(), Some("Sentosa Events"));
        assert_eq!(
            hits[1].link.as_deref(),
            Some("https://www.sentosa.com.sg/en/events/")
        );
        assert!(hits[1].snippet.is_none());

        assert_eq!(hits[2], RawHit { snippet: Some("A block with no title or link.".into()), ..Default::default() });

        // Internal search links are not absolute, so the hit has no link.
        assert_eq!(hits[3].title.as_deref(), Some("Related searches"));
        assert!(hits[3].link.is_none());
    }

    #[test]
    fn resolve_link_rejects_non_http() {
        assert_eq!(resolve_link("javascript:void(0)"), None);
        assert_eq!(resolve_link("mailto:a@b.com"), None);
        assert_eq!(resolve_link("/relative/path"), None);
        assert_eq!(resolve_link(""), None);
        assert_eq!(
            resolve_link("https://peatix.com/event/1"),
            Some("https://peatix.com/event/1".to_string())
        );
    }

    #[test]
    fn page_without_results_yields_nothing() {
        assert!(parse_results_page("<html><body><p>captcha</p></body></html>").is_empty());
    }
}
