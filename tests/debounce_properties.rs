//! Property-based tests for debounce coalescing.
//!
//! Property Under Test:
//! "However a burst of keystrokes is interleaved with stale timer callbacks, once
//! typing stops exactly one fetch is issued, for the last value typed."

mod common;

use common::{elapse, mount};
use livesearch::search::{Debouncer, Ticket};
use livesearch::{Event, SearchPhase};
use proptest::prelude::*;
use std::time::Duration;

// ===== Arbitrary Strategies =====

/// A keystroke burst: the successive values of the input.
fn arb_burst() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{1,12}", 1..20)
}

/// Which earlier tickets get a late timer callback during the burst.
fn arb_late_callbacks() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 20)
}

proptest! {
    #[test]
    fn burst_issues_one_fetch_for_last_value(burst in arb_burst(), late in arb_late_callbacks()) {
        let mut controller = mount("");
        let mut armed: Vec<Ticket> = Vec::new();

        for (i, value) in burst.iter().enumerate() {
            controller.dispatch(Event::Input { value: value.clone() });
            armed.push(controller.host().last_armed().unwrap());

            // A superseded timer firing late must not fetch.
            if i > 0 && late[i] {
                controller.dispatch(Event::DebounceElapsed { ticket: armed[i - 1] });
            }
        }

        prop_assert!(controller.host().fetches().is_empty());
        prop_assert_eq!(controller.state().phase, SearchPhase::PendingDebounce);

        elapse(&mut controller);

        let fetches = controller.host().fetches();
        prop_assert_eq!(fetches.len(), 1);
        prop_assert_eq!(&fetches[0].query, burst.last().unwrap());
    }

    #[test]
    fn only_latest_ticket_fires(count in 1usize..50) {
        let mut debouncer = Debouncer::new(Duration::from_millis(350));
        let tickets: Vec<Ticket> = (0..count).map(|i| debouncer.schedule(i).ticket).collect();

        for ticket in &tickets[..count - 1] {
            prop_assert_eq!(debouncer.fire(*ticket), None);
        }
        prop_assert_eq!(debouncer.fire(tickets[count - 1]), Some(count - 1));
        prop_assert!(!debouncer.is_pending());
    }

    #[test]
    fn each_schedule_reports_the_ticket_it_replaced(count in 2usize..50) {
        let mut debouncer = Debouncer::new(Duration::from_millis(350));
        let mut previous = debouncer.schedule(()).ticket;

        for _ in 1..count {
            let scheduled = debouncer.schedule(());
            prop_assert_eq!(scheduled.replaced, Some(previous));
            prop_assert!(scheduled.ticket > previous);
            previous = scheduled.ticket;
        }
    }
}
