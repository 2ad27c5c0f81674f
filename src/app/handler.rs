//! Event handling and state transition logic.
//!
//! [`handle_event`] is the whole search state machine. It is pure: it mutates
//! [`SearchState`] and returns the [`Action`]s the controller must perform, in order.
//!
//! # Event Types
//!
//! - **Page**: `Mounted`
//! - **Input**: `Input`, `Escape`, `Clear`, `Submit`
//! - **Timers**: `DebounceElapsed`
//! - **Network**: `FetchCompleted`
//!
//! # Example
//!
//! ```rust
//! use livesearch::app::{handle_event, Action, Event, SearchPhase, SearchState};
//! use std::time::Duration;
//!
//! let mut state = SearchState::new("", "https://shop.test/transactions", Duration::from_millis(350));
//! let actions = handle_event(&mut state, &Event::Input { value: "pen".into() })?;
//!
//! assert_eq!(state.phase, SearchPhase::PendingDebounce);
//! assert_eq!(actions[0], Action::SetClearButtonVisible(true));
//! # Ok::<(), livesearch::LiveSearchError>(())
//! ```

use super::modes::SearchPhase;
use super::{Action, SearchState};
use crate::domain::{FetchFailure, ListFragment, Result};
use crate::search::{RequestSeq, Ticket};
use chrono::Utc;

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The page finished loading with the search form present.
    ///
    /// Synchronizes the clear button, focuses the input and binds the server-rendered
    /// rows.
    Mounted,

    /// The input's value changed.
    Input {
        /// New input value.
        value: String,
    },

    /// Escape was released while the input had focus.
    Escape,

    /// The clear button was clicked.
    Clear,

    /// The form was submitted (default navigation already suppressed by the host).
    Submit,

    /// A debounce timer armed by `Action::ArmDebounce` elapsed.
    DebounceElapsed { ticket: Ticket },

    /// A fetch started by `Action::Fetch` finished.
    FetchCompleted {
        seq: RequestSeq,
        /// Query the fetch was issued for.
        query: String,
        outcome: std::result::Result<ListFragment, FetchFailure>,
    },
}

impl Event {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Input { .. } => "input",
            Self::Escape => "escape",
            Self::Clear => "clear",
            Self::Submit => "submit",
            Self::DebounceElapsed { .. } => "debounce_elapsed",
            Self::FetchCompleted { .. } => "fetch_completed",
        }
    }
}

/// Processes an event, mutates the state, and returns the actions to execute.
///
/// # Errors
///
/// None of the current transitions fail; the `Result` leaves room for transitions
/// that validate host input.
pub fn handle_event(state: &mut SearchState, event: &Event) -> Result<Vec<Action>> {
    let _span = tracing::debug_span!(
        "handle_event",
        event = event.name(),
        phase = %state.phase,
        query_len = state.query.get().len()
    )
    .entered();

    match event {
        Event::Mounted => Ok(vec![
            Action::SetClearButtonVisible(!state.query.is_empty()),
            Action::FocusInput,
            Action::BindRows,
            Action::BindEditDialog,
        ]),
        Event::Input { value } => {
            state.query.set(value.as_str());

            let mut actions = vec![Action::SetClearButtonVisible(!state.query.is_empty())];
            let scheduled = state.debouncer.schedule(());
            if let Some(replaced) = scheduled.replaced {
                actions.push(Action::CancelDebounce { ticket: replaced });
            }
            actions.push(Action::ArmDebounce {
                ticket: scheduled.ticket,
                delay: state.debouncer.delay(),
            });
            state.phase = SearchPhase::PendingDebounce;

            Ok(actions)
        }
        Event::Clear => Ok(reset_and_fetch(state, true)),
        Event::Escape => Ok(reset_and_fetch(state, false)),
        Event::Submit => {
            let mut actions = cancel_pending(state);
            actions.extend(state.dispatch_fetch());
            Ok(actions)
        }
        Event::DebounceElapsed { ticket } => {
            if state.debouncer.fire(*ticket).is_none() {
                return Ok(vec![]);
            }
            Ok(state.dispatch_fetch())
        }
        Event::FetchCompleted { seq, query, outcome } => {
            if !state.is_current(*seq, query) {
                let in_flight_age_ms = state.in_flight.as_ref().map(|flight| flight.age_ms(Utc::now()));
                tracing::debug!(
                    seq = seq.get(),
                    latest = state.last_seq.get(),
                    ?in_flight_age_ms,
                    "discarding stale response"
                );
                if state.in_flight.as_ref().is_some_and(|flight| flight.seq == *seq) {
                    state.in_flight = None;
                    if state.phase == SearchPhase::Fetching {
                        state.settle();
                    }
                }
                return Ok(vec![]);
            }

            state.in_flight = None;
            match outcome {
                Ok(fragment) => {
                    state.displayed = Some(*seq);
                    state.last_error = None;
                    state.settle();
                    Ok(vec![
                        Action::Render(fragment.clone()),
                        Action::BindRows,
                        Action::BindEditDialog,
                    ])
                }
                Err(failure) => {
                    tracing::warn!(seq = seq.get(), error = %failure, "search request failed, keeping current rows");
                    state.last_error = Some(failure.clone());
                    state.phase = SearchPhase::Error;
                    Ok(vec![])
                }
            }
        }
    }
}

/// Clear and Escape: empty the query and fetch immediately.
fn reset_and_fetch(state: &mut SearchState, focus: bool) -> Vec<Action> {
    state.query.clear();

    let mut actions = vec![Action::SetInputValue(String::new())];
    if focus {
        actions.push(Action::FocusInput);
    }
    actions.push(Action::SetClearButtonVisible(false));
    actions.extend(cancel_pending(state));
    actions.extend(state.dispatch_fetch());
    actions
}

fn cancel_pending(state: &mut SearchState) -> Vec<Action> {
    state
        .debouncer
        .cancel()
        .map(|ticket| Action::CancelDebounce { ticket })
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state(initial: &str) -> SearchState {
        SearchState::new(initial, "https://shop.test/transactions", Duration::from_millis(350))
    }

    fn fetch_of(actions: &[Action]) -> Option<&crate::search::FetchRequest> {
        actions.iter().find_map(|a| match a {
            Action::Fetch(request) => Some(request),
            _ => None,
        })
    }

    fn armed_ticket(actions: &[Action]) -> Ticket {
        actions
            .iter()
            .find_map(|a| match a {
                Action::ArmDebounce { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .unwrap()
    }

    fn input(state: &mut SearchState, value: &str) -> Vec<Action> {
        handle_event(state, &Event::Input { value: value.into() }).unwrap()
    }

    #[test]
    fn mounted_syncs_button_and_binds() {
        let mut state = state("pen");
        let actions = handle_event(&mut state, &Event::Mounted).unwrap();

        assert_eq!(
            actions,
            vec![
                Action::SetClearButtonVisible(true),
                Action::FocusInput,
                Action::BindRows,
                Action::BindEditDialog,
            ]
        );
        assert_eq!(state.phase, SearchPhase::Idle);
    }

    #[test]
    fn second_input_cancels_first_timer() {
        let mut state = state("");
        let first = armed_ticket(&input(&mut state, "p"));
        let actions = input(&mut state, "pe");

        assert!(actions.contains(&Action::CancelDebounce { ticket: first }));
        assert!(handle_event(&mut state, &Event::DebounceElapsed { ticket: first })
            .unwrap()
            .is_empty());

        let second = armed_ticket(&actions);
        let fired = handle_event(&mut state, &Event::DebounceElapsed { ticket: second }).unwrap();
        assert_eq!(fetch_of(&fired).map(|r| r.query.as_str()), Some("pe"));
        assert_eq!(state.phase, SearchPhase::Fetching);
    }

    #[test]
    fn clear_focuses_but_escape_does_not() {
        let mut state = state("abc");
        let clear = handle_event(&mut state, &Event::Clear).unwrap();
        assert!(clear.contains(&Action::FocusInput));

        let mut state = self::state("abc");
        let escape = handle_event(&mut state, &Event::Escape).unwrap();
        assert!(!escape.contains(&Action::FocusInput));
        assert_eq!(escape[0], Action::SetInputValue(String::new()));
        assert!(escape.contains(&Action::SetClearButtonVisible(false)));
        assert_eq!(fetch_of(&escape).map(|r| r.query.as_str()), Some(""));
    }

    #[test]
    fn submit_cancels_pending_debounce() {
        let mut state = state("");
        let ticket = armed_ticket(&input(&mut state, "pen"));

        let actions = handle_event(&mut state, &Event::Submit).unwrap();

        assert_eq!(actions[0], Action::CancelDebounce { ticket });
        assert_eq!(fetch_of(&actions).map(|r| r.query.as_str()), Some("pen"));
        assert!(!state.debouncer.is_pending());
    }

    #[test]
    fn failure_enters_error_and_keeps_rows() {
        let mut state = state("pen");
        let request = fetch_of(&handle_event(&mut state, &Event::Submit).unwrap()).cloned().unwrap();

        let actions = handle_event(
            &mut state,
            &Event::FetchCompleted {
                seq: request.seq,
                query: request.query,
                outcome: Err(FetchFailure::Status(500)),
            },
        )
        .unwrap();

        assert!(actions.is_empty());
        assert_eq!(state.phase, SearchPhase::Error);
        assert_eq!(state.last_error, Some(FetchFailure::Status(500)));
        assert_eq!(state.displayed, None);
    }

    #[test]
    fn response_for_outdated_query_is_discarded() {
        let mut state = state("");
        let request = fetch_of(&handle_event(&mut state, &Event::Submit).unwrap()).cloned().unwrap();
        input(&mut state, "x");

        let actions = handle_event(
            &mut state,
            &Event::FetchCompleted {
                seq: request.seq,
                query: request.query,
                outcome: Ok(ListFragment::new("<tr></tr>")),
            },
        )
        .unwrap();

        assert!(actions.is_empty());
        assert!(state.in_flight.is_none());
        assert_eq!(state.phase, SearchPhase::PendingDebounce);
    }
}
