//! Light/dark theme preference.
//!
//! The theme is page-wide state that lives outside the search core. [`ThemeState`]
//! reads the persisted preference once at startup (falling back to the system
//! preference), writes every change through to its [`PreferenceStore`], and
//! [`ThemeState::apply`] reflects the mode on the page.

use crate::dom::Dom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Storage key of the persisted mode.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// Class on `<body>` while dark mode is active.
pub const DARK_CLASS: &str = "dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon offered by the toggle: a sun while dark (switch to light), a moon while light.
    #[must_use]
    pub const fn icon_class(self) -> &'static str {
        match self {
            Self::Dark => "bi bi-sun",
            Self::Light => "bi bi-moon",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme mode: {other}")),
        }
    }
}

/// Key/value persistence for user preferences (`localStorage` in the browser).
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;

    fn save(&mut self, key: &str, value: &str);
}

/// In-memory [`PreferenceStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences(HashMap<String, String>);

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }
}

/// The page's theme mode and where it is persisted.
///
/// # Examples
///
/// ```
/// use livesearch::theme::{MemoryPreferences, ThemeMode, ThemeState};
///
/// let mut theme = ThemeState::init(MemoryPreferences::new(), "theme", true);
/// assert_eq!(theme.mode(), ThemeMode::Dark);
///
/// theme.toggle();
/// assert_eq!(theme.store().get("theme"), Some("light"));
/// ```
#[derive(Debug, Clone)]
pub struct ThemeState<S> {
    store: S,
    key: String,
    mode: ThemeMode,
}

impl<S: PreferenceStore> ThemeState<S> {
    /// Reads the persisted mode, else the system preference, and persists the result.
    ///
    /// An unrecognized stored value is ignored.
    pub fn init(store: S, key: impl Into<String>, prefers_dark: bool) -> Self {
        let key = key.into();
        let stored = store.load(&key).and_then(|value| match value.parse::<ThemeMode>() {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring stored theme");
                None
            }
        });
        let mode = stored.unwrap_or(if prefers_dark { ThemeMode::Dark } else { ThemeMode::Light });

        let mut state = Self {
            store,
            key,
            mode,
        };
        state.set(mode);
        state
    }

    #[must_use]
    pub const fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Sets and persists the mode.
    pub fn set(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.store.save(&self.key, mode.as_str());
        tracing::debug!(%mode, "theme set");
    }

    /// Flips the mode and returns the new one.
    pub fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.toggled());
        self.mode
    }

    /// Reflects the mode on the page: the `dark` body class and the toggle icon.
    pub fn apply<D: Dom + ?Sized>(&self, dom: &mut D, icon_id: &str) {
        if let Some(body) = dom.body() {
            dom.set_class(&body, DARK_CLASS, self.mode == ThemeMode::Dark);
        }
        if let Some(icon) = dom.element_by_id(icon_id) {
            dom.set_attribute(&icon, "class", self.mode.icon_class());
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    fn stored(value: &str) -> MemoryPreferences {
        let mut prefs = MemoryPreferences::new();
        prefs.save(DEFAULT_STORAGE_KEY, value);
        prefs
    }

    #[test]
    fn stored_preference_wins_over_system() {
        let theme = ThemeState::init(stored("light"), DEFAULT_STORAGE_KEY, true);
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn unknown_stored_value_falls_back_to_system() {
        let theme = ThemeState::init(stored("sepia"), DEFAULT_STORAGE_KEY, true);
        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert_eq!(theme.store().get(DEFAULT_STORAGE_KEY), Some("dark"));
    }

    #[test]
    fn apply_sets_body_class_and_icon() {
        let mut dom = MemoryDom::parse(
            r#"<body class="app"><button id="toggleNightMode"><i id="themeIcon" class="bi bi-moon"></i></button></body>"#,
        )
        .unwrap();
        let mut theme = ThemeState::init(MemoryPreferences::new(), DEFAULT_STORAGE_KEY, false);

        theme.toggle();
        theme.apply(&mut dom, "themeIcon");

        let body = dom.body().unwrap();
        let icon = dom.element_by_id("themeIcon").unwrap();
        assert!(dom.has_class(body, DARK_CLASS));
        assert!(dom.has_class(body, "app"));
        assert_eq!(dom.attribute(&icon, "class").as_deref(), Some("bi bi-sun"));

        theme.toggle();
        theme.apply(&mut dom, "themeIcon");
        assert!(!dom.has_class(body, DARK_CLASS));
        assert_eq!(dom.attribute(&icon, "class").as_deref(), Some("bi bi-moon"));
    }

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
    }
}
