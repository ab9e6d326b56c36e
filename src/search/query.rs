/// Search term carried in a location's query string (`?q=...`).
///
/// The search overlay starts open when the page is loaded with a term, e.g.
/// after navigating back from a results page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    term: Option<String>,
}

impl SearchQuery {
    /// Parses a location search string. The leading `?` is optional.
    pub fn from_search(search: &str) -> Self {
        let raw = search.strip_prefix('?').unwrap_or(search);
        let term = url::form_urlencoded::parse(raw.as_bytes())
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self { term }
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn overlay_initially_open(&self) -> bool {
        self.term.is_some()
    }
}
