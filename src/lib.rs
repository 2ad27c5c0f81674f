//! Livesearch: incremental search for server-rendered record lists.
//!
//! Livesearch is a WebAssembly controller for a page that shows a table of records
//! and a search box. It provides:
//! - Debounced search-as-you-type with immediate clear, Escape and submit
//! - Partial (rows-only) fetches with whole-list replacement
//! - Stale response protection when requests overlap
//! - Hover toolbars, tooltips and an edit dialog re-bound after every render
//! - Address bar sync so searches are shareable and survive reload
//! - A persisted light/dark theme toggle

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Browser Shim (web/, wasm32 only)                   │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Executes actions
//! │  - SearchController, Host trait                     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Stale response guard                             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search        │   │ Document      │   │ Theme         │
//! │ (search/)     │   │ (dom/)        │   │ (theme/)      │
//! │ - Debouncer   │   │ - Dom trait   │   │ - ThemeState  │
//! │ - Fetcher     │   │ - MemoryDom   │   │ - Preferences │
//! │ - Binders     │   │ - Behaviors   │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/), Observability (observability/)   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Search state machine with event/action model
//! - [`domain`]: Errors, list fragments, edit form records
//! - [`dom`]: Document seam and the in-memory document
//! - [`search`]: Debouncer, query store, fetcher, renderer, binders
//! - [`runtime`]: Controller that runs the state machine against a page
//! - [`theme`]: Light/dark preference
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! Defaults match the transactions page template. The search form may override
//! them with data attributes:
//!
//! ```html
//! <form id="transactionsSearchForm" data-debounce-ms="250" data-trace-level="debug">
//! ```
//!
//! or replace the whole configuration with a `data-config` JSON object (see
//! [`Config::from_json`]).
//!
//! # Examples
//!
//! ```rust
//! use livesearch::{handle_event, initialize, Action, Config, Event};
//!
//! let config = Config::default();
//! let mut state = initialize(&config, "", "https://shop.test/transactions");
//!
//! let actions = handle_event(&mut state, &Event::Clear)?;
//! assert!(actions.iter().any(|a| matches!(a, Action::Fetch(r) if r.query.is_empty())));
//! # Ok::<(), livesearch::LiveSearchError>(())
//! ```

pub mod app;
pub mod dom;
pub mod domain;
pub mod observability;
pub mod runtime;
pub mod search;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{handle_event, Action, Event, SearchPhase, SearchState};
pub use domain::{LiveSearchError, Result};
pub use runtime::{Host, SearchController};

use dom::Selector;
use search::EditFormLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Element ids, names and classes the controller looks up on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Id of the search `<form>`.
    pub search_form: String,
    /// `name` of the query input inside the form.
    pub input_name: String,
    pub clear_button: String,
    /// Id of the element whose children are the rows.
    pub rows_container: String,
    pub row_class: String,
    /// Class of the toolbar inside each row.
    pub toolbar_class: String,
    /// Marker of elements that get a tooltip widget.
    pub tooltip_marker: Selector,
    pub edit_modal: String,
    pub edit_form: EditFormLayout,
    pub theme_toggle: String,
    pub theme_icon: String,
    /// Preference key the theme mode is persisted under.
    pub theme_key: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            search_form: "transactionsSearchForm".to_string(),
            input_name: "q".to_string(),
            clear_button: "clearSearchBtn".to_string(),
            rows_container: "transactionsRows".to_string(),
            row_class: "table-row-with-toolbar".to_string(),
            toolbar_class: "action-toolbar".to_string(),
            tooltip_marker: Selector::attribute("data-bs-toggle", "tooltip"),
            edit_modal: "editTransactionModal".to_string(),
            edit_form: EditFormLayout::default(),
            theme_toggle: "toggleNightMode".to_string(),
            theme_icon: "themeIcon".to_string(),
            theme_key: theme::DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period before a typed query is fetched. Default: 350
    pub debounce_ms: u64,

    /// `EnvFilter` directives for logging.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or per-target directives.
    /// Default: `"info"`
    pub trace_level: Option<String>,

    pub layout: PageLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 350,
            trace_level: None,
            layout: PageLayout::default(),
        }
    }
}

impl Config {
    /// Parses configuration from string pairs, such as a form's data attributes.
    ///
    /// Unknown keys are ignored and unparseable values fall back to defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use livesearch::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "200".to_string());
    /// map.insert("trace_level".to_string(), "debug".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.debounce_ms, 200);
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let debounce_ms = config
            .get("debounce_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(350);

        let trace_level = config
            .get("trace_level")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            debounce_ms,
            trace_level,
            layout: PageLayout::default(),
        }
    }

    /// Parses a JSON object; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LiveSearchError::Config`] for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LiveSearchError::Config(e.to_string()))
    }

    #[must_use]
    pub const fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Creates the search state for a page.
///
/// `initial_query` is the input's value at page load and `href` the page address.
pub fn initialize(config: &Config, initial_query: impl Into<String>, href: &str) -> SearchState {
    tracing::debug!(debounce_ms = config.debounce_ms, "initializing live search");

    let store = search::SearchQueryStore::with_param(initial_query, href, &config.layout.input_name);
    SearchState::with_store(store, config.debounce_delay())
}
