//! Runs the search state machine against a document and a host.
//!
//! [`SearchController`] owns a [`SearchState`], a [`Dom`] and a [`Host`]. Every
//! [`Event`] goes through [`handle_event`] and the resulting actions are executed in
//! order. Timers and fetches are started through the host, which reports back by
//! dispatching `DebounceElapsed` and `FetchCompleted` events later.
//!
//! # Example
//!
//! ```rust
//! use livesearch::dom::MemoryDom;
//! use livesearch::runtime::{Host, SearchController};
//! use livesearch::search::{FetchRequest, Ticket};
//! use livesearch::{Config, Result};
//! use std::time::Duration;
//! use url::Url;
//!
//! #[derive(Default)]
//! struct Quiet;
//!
//! impl Host for Quiet {
//!     fn arm_timer(&mut self, _: Ticket, _: Duration) -> Result<()> { Ok(()) }
//!     fn cancel_timer(&mut self, _: Ticket) -> Result<()> { Ok(()) }
//!     fn start_fetch(&mut self, _: FetchRequest) -> Result<()> { Ok(()) }
//!     fn replace_location(&mut self, _: &Url) -> Result<()> { Ok(()) }
//! }
//!
//! let dom = MemoryDom::parse(r#"<body>
//!   <form id="transactionsSearchForm"><input name="q" value=""></form>
//!   <table><tbody id="transactionsRows"></tbody></table>
//! </body>"#)?;
//!
//! let controller = SearchController::mount(&Config::default(), dom, Quiet, "https://shop.test/");
//! assert!(controller.is_some());
//! # Ok::<(), livesearch::LiveSearchError>(())
//! ```

use crate::app::{handle_event, Action, Event, SearchState};
use crate::dom::{Dom, Selector};
use crate::domain::Result;
use crate::search::{renderer, EditRequestBinder, FetchRequest, RowBehaviorBinder, Ticket};
use crate::Config;
use std::time::Duration;
use url::Url;

/// Effects that need the embedding environment.
///
/// Timers and fetches are fire-and-forget here; their results come back as events.
pub trait Host {
    /// Delivers `Event::DebounceElapsed { ticket }` after `delay`.
    fn arm_timer(&mut self, ticket: Ticket, delay: Duration) -> Result<()>;

    fn cancel_timer(&mut self, ticket: Ticket) -> Result<()>;

    /// Starts `request` and delivers `Event::FetchCompleted` when it settles.
    fn start_fetch(&mut self, request: FetchRequest) -> Result<()>;

    /// Rewrites the address bar without navigation.
    fn replace_location(&mut self, url: &Url) -> Result<()>;
}

/// Display value of the clear button when the query is non-empty.
const CLEAR_VISIBLE: &str = "inline-flex";
const CLEAR_HIDDEN: &str = "none";

/// The live search feature of one page.
pub struct SearchController<D: Dom, H: Host> {
    state: SearchState,
    dom: D,
    host: H,
    input: D::Node,
    clear_button: Option<D::Node>,
    container: D::Node,
    rows: RowBehaviorBinder,
    edit: EditRequestBinder,
}

impl<D: Dom, H: Host> SearchController<D, H> {
    /// Wires the controller to the page and dispatches [`Event::Mounted`].
    ///
    /// Returns `None` when the page has no search form, or the form lacks its input or
    /// rows container; the feature is simply not present there.
    pub fn mount(config: &Config, dom: D, host: H, href: &str) -> Option<Self> {
        let layout = &config.layout;

        let Some(form) = dom.element_by_id(&layout.search_form) else {
            tracing::debug!(form = %layout.search_form, "no search form on page");
            return None;
        };
        let Some(input) = dom.query_first(&form, &Selector::attribute("name", &layout.input_name)) else {
            tracing::debug!(name = %layout.input_name, "search form has no query input");
            return None;
        };
        let Some(container) = dom.element_by_id(&layout.rows_container) else {
            tracing::debug!(container = %layout.rows_container, "no rows container on page");
            return None;
        };
        let clear_button = dom.element_by_id(&layout.clear_button);
        if clear_button.is_none() {
            tracing::debug!(button = %layout.clear_button, "no clear button on page");
        }

        let state = crate::initialize(config, dom.value(&input), href);
        let mut controller = Self {
            state,
            dom,
            host,
            input,
            clear_button,
            container,
            rows: RowBehaviorBinder::new(layout),
            edit: EditRequestBinder::new(&layout.edit_modal, layout.edit_form.clone()),
        };

        tracing::info!(query_len = controller.state.query.get().len(), "live search mounted");
        controller.dispatch(Event::Mounted);
        Some(controller)
    }

    /// Handles one event and performs the resulting actions.
    ///
    /// A failed fetch is settled back to a resting phase before this returns. When the
    /// document rejects a fragment, `displayed` goes back to the rows still on screen.
    pub fn dispatch(&mut self, event: Event) {
        let displayed = self.state.displayed;
        let actions = match handle_event(&mut self.state, &event) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::error!(error = %e, event = event.name(), "event handling failed");
                return;
            }
        };

        for action in actions {
            let renders = matches!(action, Action::Render(_));
            match self.execute(action) {
                Err(e) if renders => {
                    tracing::warn!(error = %e, "fragment rejected, keeping current rows");
                    self.state.displayed = displayed;
                }
                Err(e) => tracing::warn!(error = %e, "action failed"),
                Ok(()) => {}
            }
        }

        self.state.recover();
    }

    fn execute(&mut self, action: Action) -> Result<()> {
        tracing::trace!(?action, "executing action");

        match action {
            Action::ArmDebounce { ticket, delay } => self.host.arm_timer(ticket, delay),
            Action::CancelDebounce { ticket } => self.host.cancel_timer(ticket),
            Action::ReplaceLocation(url) => self.host.replace_location(&url),
            Action::Fetch(request) => self.host.start_fetch(request),
            Action::SetInputValue(value) => {
                self.dom.set_value(&self.input, &value);
                Ok(())
            }
            Action::SetClearButtonVisible(visible) => {
                if let Some(button) = &self.clear_button {
                    let display = if visible { CLEAR_VISIBLE } else { CLEAR_HIDDEN };
                    self.dom.set_style(button, "display", display);
                }
                Ok(())
            }
            Action::FocusInput => {
                self.dom.focus(&self.input);
                Ok(())
            }
            Action::Render(fragment) => renderer::render(&mut self.dom, &self.container, &fragment),
            Action::BindRows => {
                self.rows.bind(&mut self.dom, &self.container);
                Ok(())
            }
            Action::BindEditDialog => {
                self.edit.bind(&mut self.dom);
                Ok(())
            }
        }
    }

    /// Binds hover toolbars and tooltips again after rows were changed outside the
    /// controller. Returns the row count.
    pub fn rebind_rows(&mut self) -> usize {
        self.rows.bind(&mut self.dom, &self.container)
    }

    #[must_use]
    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub const fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The search input element.
    #[must_use]
    pub const fn input(&self) -> &D::Node {
        &self.input
    }

    /// The rows container.
    #[must_use]
    pub const fn container(&self) -> &D::Node {
        &self.container
    }

    #[must_use]
    pub const fn clear_button(&self) -> Option<&D::Node> {
        self.clear_button.as_ref()
    }
}
