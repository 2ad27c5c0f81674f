//! The list fragment returned by a partial fetch.

use std::fmt;

/// Opaque row markup for one query.
///
/// A fragment is created by the fetch step and consumed whole by the renderer; it is
/// never patched. Equality is byte equality of the markup.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ListFragment(String);

impl ListFragment {
    #[must_use]
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    #[must_use]
    pub fn markup(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_markup(self) -> String {
        self.0
    }

    /// True when the server returned no rows (whitespace only).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ListFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListFragment")
            .field("len", &self.0.len())
            .finish()
    }
}

impl From<String> for ListFragment {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

impl From<&str> for ListFragment {
    fn from(markup: &str) -> Self {
        Self(markup.to_string())
    }
}
