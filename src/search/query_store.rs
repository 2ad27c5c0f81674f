//! The current query and its mirror in the page address.

use url::Url;

/// Fallback base used when the page address cannot be parsed.
const FALLBACK_BASE: &str = "http://localhost/";

/// Owns the query string and the last known page address.
///
/// The address is kept so that fetches target the current page with the `q`
/// parameter substituted, and so the address bar can be rewritten without a
/// navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQueryStore {
    query: String,
    location: Url,
    param: String,
}

impl SearchQueryStore {
    /// Query parameter carrying the search term.
    pub const PARAM: &'static str = "q";

    /// Creates a store from the input's initial value and the page address.
    ///
    /// A malformed `href` is tolerated: relative addresses are resolved against a
    /// local base, and anything else falls back to the base itself.
    #[must_use]
    pub fn new(initial: impl Into<String>, href: &str) -> Self {
        Self::with_param(initial, href, Self::PARAM)
    }

    #[must_use]
    pub fn with_param(initial: impl Into<String>, href: &str, param: &str) -> Self {
        let location = Url::parse(href)
            .or_else(|_| Url::parse(FALLBACK_BASE).and_then(|base| base.join(href)))
            .unwrap_or_else(|err| {
                tracing::debug!(%href, error = %err, "unusable page address, using fallback");
                fallback_location()
            });

        Self {
            query: initial.into(),
            location,
            param: param.to_string(),
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.query
    }

    /// Replaces the query. Returns whether it changed.
    pub fn set(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.query {
            return false;
        }
        self.query = query;
        true
    }

    pub fn clear(&mut self) -> bool {
        self.set(String::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Last address produced by [`sync_to_location`](Self::sync_to_location), or the
    /// page address.
    #[must_use]
    pub const fn location(&self) -> &Url {
        &self.location
    }

    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Writes `query` into the address's query parameter and returns the new address.
    ///
    /// The first occurrence of the parameter is replaced in place and any duplicates
    /// are dropped; every other parameter keeps its position and value. An empty
    /// query is still written (`?q=`) so the server sees an explicit empty search.
    ///
    /// ```
    /// use livesearch::search::SearchQueryStore;
    ///
    /// let mut store = SearchQueryStore::new("", "https://shop.test/transactions?page=2&q=old");
    /// let url = store.sync_to_location("pen ink");
    /// assert_eq!(url.as_str(), "https://shop.test/transactions?page=2&q=pen+ink");
    /// ```
    pub fn sync_to_location(&mut self, query: &str) -> Url {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut written = false;

        for (name, value) in self.location.query_pairs() {
            if name == self.param.as_str() {
                if !written {
                    pairs.push((self.param.clone(), query.to_string()));
                    written = true;
                }
            } else {
                pairs.push((name.into_owned(), value.into_owned()));
            }
        }
        if !written {
            pairs.push((self.param.clone(), query.to_string()));
        }

        self.location.query_pairs_mut().clear().extend_pairs(pairs);
        self.location.clone()
    }
}

fn fallback_location() -> Url {
    // FALLBACK_BASE is a literal absolute URL.
    Url::parse(FALLBACK_BASE).unwrap_or_else(|_| unreachable!("fallback base is a valid URL"))
}
