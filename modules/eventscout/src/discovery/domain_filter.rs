/// Trusted event-publishing domains. A link passes when any fragment occurs
/// anywhere in it, ignoring case.
#[derive(Debug, Clone)]
pub struct DomainAllowlist {
    fragments: Vec<String>,
}

impl DomainAllowlist {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fragments: fragments
                .into_iter()
                .map(|f| f.as_ref().trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    pub fn is_trusted(&self, link: &str) -> bool {
        let link = link.to_lowercase();
        self.fragments.iter().any(|f| link.contains(f.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist() -> DomainAllowlist {
        DomainAllowlist::new(["esplanade", "nhb.gov.sg", "Peatix"])
    }

    #[test]
    fn matches_fragment_case_insensitively() {
        let list = allowlist();
        assert!(list.is_trusted("https://www.ESPLANADE.com/whats-on"));
        assert!(list.is_trusted("https://peatix.com/event/42"));
        assert!(list.is_trusted("https://www.nhb.gov.sg/what-we-do"));
    }

    #[test]
    fn untrusted_blog_is_rejected() {
        assert!(!allowlist().is_trusted("https://randomblog.example.com/post"));
    }

    #[test]
    fn blank_fragments_are_ignored() {
        let list = DomainAllowlist::new(["", "  ", "sistic"]);
        assert!(!list.is_trusted("https://example.com"));
        assert!(list.is_trusted("https://www.sistic.com.sg/events"));
    }

    #[test]
    fn empty_allowlist_trusts_nothing() {
        let list = DomainAllowlist::new(Vec::<String>::new());
        assert!(!list.is_trusted("https://www.esplanade.com"));
    }
}
