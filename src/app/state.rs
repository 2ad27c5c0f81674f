//! Search state container.
//!
//! [`SearchState`] is the single source of truth for the controller: the query, the
//! debounce bookkeeping, the phase, and which fetch (if any) is allowed to update the
//! list. It is mutated only by [`handle_event`](super::handle_event).
//!
//! # Stale responses
//!
//! Fetches are never cancelled. Instead every dispatched fetch gets the next
//! [`RequestSeq`] and is remembered as [`InFlight`]. A completion is applied only when
//! its sequence number is the in-flight one and its query still equals the current
//! query; anything else is a leftover from a superseded request.
//!
//! # Example
//!
//! ```rust
//! use livesearch::app::{SearchPhase, SearchState};
//! use livesearch::app::Action;
//! use std::time::Duration;
//!
//! let mut state = SearchState::new("pen", "https://shop.test/transactions", Duration::from_millis(350));
//! let actions = state.dispatch_fetch();
//!
//! assert_eq!(state.phase, SearchPhase::Fetching);
//! assert!(matches!(&actions[1], Action::Fetch(request) if request.query == "pen"));
//! ```

use super::modes::SearchPhase;
use super::Action;
use crate::domain::FetchFailure;
use crate::search::{Debouncer, FetchRequest, RequestSeq, SearchQueryStore};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// The fetch currently allowed to update the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlight {
    pub seq: RequestSeq,
    pub query: String,
    pub issued_at: DateTime<Utc>,
}

impl InFlight {
    /// Milliseconds since the fetch was issued.
    #[must_use]
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.issued_at).num_milliseconds()
    }
}

/// Central state of one search form.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Current query and page address.
    pub query: SearchQueryStore,

    /// Position in the input → fetch → render cycle.
    pub phase: SearchPhase,

    /// Pending debounced fetch, if any.
    pub debouncer: Debouncer<()>,

    /// Sequence number of the most recently dispatched fetch.
    pub last_seq: RequestSeq,

    /// The latest dispatched fetch, until it completes.
    pub in_flight: Option<InFlight>,

    /// Sequence number of the fetch whose rows are displayed. `None` means the
    /// server-rendered rows from page load.
    pub displayed: Option<RequestSeq>,

    /// Most recent fetch failure, cleared by the next successful render.
    pub last_error: Option<FetchFailure>,
}

impl SearchState {
    /// Creates the state for a page whose input starts with `initial` at address `href`.
    #[must_use]
    pub fn new(initial: impl Into<String>, href: &str, delay: Duration) -> Self {
        Self::with_store(SearchQueryStore::new(initial, href), delay)
    }

    #[must_use]
    pub fn with_store(query: SearchQueryStore, delay: Duration) -> Self {
        Self {
            query,
            phase: SearchPhase::Idle,
            debouncer: Debouncer::new(delay),
            last_seq: RequestSeq::default(),
            in_flight: None,
            displayed: None,
            last_error: None,
        }
    }

    /// Issues a fetch for the current query.
    ///
    /// Returns the address bar update followed by the fetch itself. Any previous
    /// in-flight fetch is superseded.
    pub fn dispatch_fetch(&mut self) -> Vec<Action> {
        self.last_seq = self.last_seq.next();
        let query = self.query.get().to_string();
        let url = self.query.sync_to_location(&query);

        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(
                superseded = previous.seq.get(),
                seq = self.last_seq.get(),
                "fetch superseded"
            );
        }

        self.in_flight = Some(InFlight {
            seq: self.last_seq,
            query: query.clone(),
            issued_at: Utc::now(),
        });
        self.phase = SearchPhase::Fetching;

        tracing::debug!(seq = self.last_seq.get(), query_len = query.len(), "fetch dispatched");

        vec![
            Action::ReplaceLocation(url.clone()),
            Action::Fetch(FetchRequest {
                seq: self.last_seq,
                query,
                url,
            }),
        ]
    }

    /// Whether a completion for `seq`/`query` may update the list.
    #[must_use]
    pub fn is_current(&self, seq: RequestSeq, query: &str) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|flight| flight.seq == seq && flight.query == query && query == self.query.get())
    }

    /// Leaves a terminal phase: back to `PendingDebounce` if a timer is armed, else `Idle`.
    pub fn settle(&mut self) {
        self.phase = if self.debouncer.is_pending() {
            SearchPhase::PendingDebounce
        } else if self.in_flight.is_some() {
            SearchPhase::Fetching
        } else {
            SearchPhase::Idle
        };
    }

    /// Settles a failed fetch back to a resting phase. No-op in any other phase.
    pub fn recover(&mut self) {
        if self.phase == SearchPhase::Error {
            self.settle();
            tracing::debug!(phase = %self.phase, "recovered from fetch error");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(query: &str) -> SearchState {
        SearchState::new(query, "https://shop.test/transactions?page=1", Duration::from_millis(350))
    }

    #[test]
    fn dispatch_syncs_location_and_bumps_seq() {
        let mut state = state("pen");

        let first = state.dispatch_fetch();
        let second = state.dispatch_fetch();

        assert_eq!(
            first[0],
            Action::ReplaceLocation("https://shop.test/transactions?page=1&q=pen".parse().unwrap())
        );
        let (Action::Fetch(a), Action::Fetch(b)) = (&first[1], &second[1]) else {
            panic!("expected fetch actions");
        };
        assert!(b.seq > a.seq);
        assert_eq!(state.in_flight.as_ref().map(|f| f.seq), Some(b.seq));
    }

    #[test]
    fn in_flight_age_counts_from_issue() {
        let mut state = state("pen");
        state.dispatch_fetch();
        let flight = state.in_flight.clone().unwrap();

        let later = flight.issued_at + chrono::Duration::milliseconds(1200);
        assert_eq!(flight.age_ms(later), 1200);
        assert_eq!(flight.age_ms(flight.issued_at), 0);
    }

    #[test]
    fn only_latest_matching_query_is_current() {
        let mut state = state("a");
        state.dispatch_fetch();
        let old = state.last_seq;
        state.query.set("b");
        state.dispatch_fetch();

        assert!(!state.is_current(old, "a"));
        assert!(state.is_current(state.last_seq, "b"));

        state.query.set("bc");
        assert!(!state.is_current(state.last_seq, "b"));
    }

    #[test]
    fn recover_only_leaves_error() {
        let mut state = state("");
        state.dispatch_fetch();
        state.recover();
        assert_eq!(state.phase, SearchPhase::Fetching);

        state.in_flight = None;
        state.phase = SearchPhase::Error;
        state.recover();
        assert_eq!(state.phase, SearchPhase::Idle);
    }
}
