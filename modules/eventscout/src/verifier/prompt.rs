use eventscout_common::{Candidate, Category};

/// Locality and cutoff baked into the extraction contract.
#[derive(Debug, Clone)]
pub struct VerificationPrompt {
    pub locality: String,
    pub future_cutoff: String,
}

impl VerificationPrompt {
    pub fn new(locality: impl Into<String>, future_cutoff: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            future_cutoff: future_cutoff.into(),
        }
    }

    pub fn system(&self) -> String {
        let locality = &self.locality;
        let cutoff = &self.future_cutoff;
        let categories = Category::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "You verify and structure event listings for {locality}.\n\n\
             Decide whether a search result describes a REAL, UPCOMING event in {locality} \
             (not past, not fake, not a generic listing page).\n\n\
             RULES:\n\
             - Only accept future events, dated {cutoff} onwards\n\
             - The event must take place in {locality}\n\
             - The date and the venue must both be clear\n\
             - Classify into exactly one category: {categories}\n\
             - Price is a number; use 0 for free admission\n\
             - The description is one clear sentence\n\
             - Echo the link exactly as given\n\
             - Reject past events, vague details, or anything outside {locality}\n\n\
             Respond with ONLY a JSON object of this shape, nothing else:\n\
             {{\n\
             \x20 \"is_valid\": true or false,\n\
             \x20 \"event\": {{\n\
             \x20   \"title\": \"Event name (short, clear)\",\n\
             \x20   \"date\": \"Date range (e.g. '13 Dec - 14 Dec' or 'Daily')\",\n\
             \x20   \"category\": \"one of: {categories}\",\n\
             \x20   \"price\": 0,\n\
             \x20   \"venue\": \"Venue name\",\n\
             \x20   \"description\": \"One clear sentence about the event\",\n\
             \x20   \"link\": \"the link, unchanged\",\n\
             \x20   \"emoji\": \"one relevant emoji\"\n\
             \x20 }},\n\
             \x20 \"reasoning\": \"why it is valid or not\"\n\
             }}\n\
             Omit \"event\" when is_valid is false."
        )
    }

    pub fn user(&self, candidate: &Candidate) -> String {
        format!(
            "SEARCH RESULT:\nTitle: {}\nLink: {}\nSnippet: {}",
            candidate.title, candidate.link, candidate.snippet
        )
    }
}
