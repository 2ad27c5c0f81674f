//! The small selector language the components need.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element selector understood by every [`Dom`](super::Dom) implementation.
///
/// Only the two forms the page template relies on are supported: a class name and an
/// exact attribute match. Browser implementations turn these into CSS; the in-memory
/// document matches them directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// `.name`
    Class(String),
    /// `[name="value"]`
    Attribute { name: String, value: String },
}

impl Selector {
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// CSS form, for `querySelectorAll`.
    ///
    /// ```
    /// use livesearch::dom::Selector;
    ///
    /// assert_eq!(Selector::class("action-toolbar").to_css(), ".action-toolbar");
    /// assert_eq!(Selector::attribute("name", "q").to_css(), r#"[name="q"]"#);
    /// ```
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Class(name) => format!(".{name}"),
            Self::Attribute { name, value } => {
                format!("[{name}=\"{}\"]", value.replace('\\', "\\\\").replace('"', "\\\""))
            }
        }
    }

    /// Matches an element given a way to read its attributes.
    pub fn matches<F>(&self, attribute: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Self::Class(name) => attribute("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == name)),
            Self::Attribute { name, value } => attribute(name).is_some_and(|v| &v == value),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_matches_any_token() {
        let selector = Selector::class("row");
        assert!(selector.matches(|_| Some("table row selected".into())));
        assert!(!selector.matches(|_| Some("rows".into())));
        assert!(!selector.matches(|_| None));
    }

    #[test]
    fn attribute_requires_exact_value() {
        let selector = Selector::attribute("data-bs-toggle", "tooltip");
        assert!(selector.matches(|n| (n == "data-bs-toggle").then(|| "tooltip".into())));
        assert!(!selector.matches(|n| (n == "data-bs-toggle").then(|| "modal".into())));
    }

    #[test]
    fn css_escapes_quotes() {
        let selector = Selector::attribute("title", r#"say "hi""#);
        assert_eq!(selector.to_css(), r#"[title="say \"hi\""]"#);
    }
}
