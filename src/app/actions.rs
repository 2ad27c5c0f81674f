//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never touches the page, a timer or the
//! network. It returns a `Vec<Action>` and the
//! [`SearchController`](crate::runtime::SearchController) performs them in order
//! against its [`Dom`](crate::dom::Dom) and [`Host`](crate::runtime::Host).
//!
//! # Example
//!
//! ```rust
//! use livesearch::app::Action;
//!
//! let actions = vec![Action::SetInputValue(String::new()), Action::SetClearButtonVisible(false)];
//! assert!(!actions.contains(&Action::FocusInput));
//! ```

use crate::domain::ListFragment;
use crate::search::{FetchRequest, Ticket};
use std::time::Duration;
use url::Url;

/// Commands executed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Arms a host timer that delivers `Event::DebounceElapsed { ticket }` after `delay`.
    ArmDebounce { ticket: Ticket, delay: Duration },

    /// Cancels the host timer for `ticket`, if it has not fired yet.
    CancelDebounce { ticket: Ticket },

    /// Rewrites the address bar without navigating.
    ReplaceLocation(Url),

    /// Starts a partial fetch.
    ///
    /// The host reports the outcome back as `Event::FetchCompleted`.
    Fetch(FetchRequest),

    /// Overwrites the search input's value.
    SetInputValue(String),

    /// Shows (`inline-flex`) or hides (`none`) the clear button.
    SetClearButtonVisible(bool),

    /// Moves focus to the search input.
    FocusInput,

    /// Replaces the rows container with the fragment.
    Render(ListFragment),

    /// Runs the row binder over the rows container.
    BindRows,

    /// Runs the edit dialog binder.
    BindEditDialog,
}
