//! Quiet-period debouncing without owning a timer.
//!
//! The [`Debouncer`] only does the bookkeeping: which payload is pending and which
//! timer ticket may still deliver it. Arming and cancelling the actual timer is the
//! host's job, driven by the tickets handed out here. A late timer callback for a
//! superseded ticket is therefore harmless: [`Debouncer::fire`] ignores it.

use std::time::Duration;

/// Default quiet period before a search is issued.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(350);

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Result of [`Debouncer::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    /// Ticket of the newly armed timer.
    pub ticket: Ticket,
    /// Ticket whose pending payload was dropped, if any. Its timer should be cancelled.
    pub replaced: Option<Ticket>,
}

/// Holds at most one pending payload.
///
/// # Examples
///
/// ```
/// use livesearch::search::Debouncer;
/// use std::time::Duration;
///
/// let mut debouncer = Debouncer::new(Duration::from_millis(350));
/// let first = debouncer.schedule("a");
/// let second = debouncer.schedule("ab");
///
/// assert_eq!(second.replaced, Some(first.ticket));
/// assert_eq!(debouncer.fire(first.ticket), None);
/// assert_eq!(debouncer.fire(second.ticket), Some("ab"));
/// assert_eq!(debouncer.fire(second.ticket), None);
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    next: u64,
    pending: Option<(Ticket, T)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            next: 0,
            pending: None,
        }
    }

    /// Replaces any pending payload with `payload` under a fresh ticket.
    pub fn schedule(&mut self, payload: T) -> Scheduled {
        self.next += 1;
        let ticket = Ticket(self.next);
        let replaced = self.pending.replace((ticket, payload)).map(|(t, _)| t);

        tracing::trace!(ticket = ticket.0, replaced = ?replaced.map(Ticket::get), "debounce armed");
        Scheduled { ticket, replaced }
    }

    /// Takes the payload if `ticket` is the one currently pending.
    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        match &self.pending {
            Some((current, _)) if *current == ticket => self.pending.take().map(|(_, p)| p),
            _ => {
                tracing::trace!(ticket = ticket.0, "ignoring superseded debounce ticket");
                None
            }
        }
    }

    /// Drops the pending payload, returning the ticket whose timer should be cancelled.
    pub fn cancel(&mut self) -> Option<Ticket> {
        self.pending.take().map(|(ticket, _)| ticket)
    }

    #[must_use]
    pub fn pending(&self) -> Option<Ticket> {
        self.pending.as_ref().map(|(ticket, _)| *ticket)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_schedule_replaces_nothing() {
        let mut debouncer = Debouncer::<()>::default();
        let scheduled = debouncer.schedule(());

        assert_eq!(scheduled.replaced, None);
        assert_eq!(debouncer.pending(), Some(scheduled.ticket));
        assert_eq!(debouncer.delay(), DEFAULT_DELAY);
    }

    #[test]
    fn tickets_are_monotonic() {
        let mut debouncer = Debouncer::<u8>::default();
        let a = debouncer.schedule(1).ticket;
        debouncer.cancel();
        let b = debouncer.schedule(2).ticket;
        assert!(b > a);
    }

    #[test]
    fn cancel_prevents_fire() {
        let mut debouncer = Debouncer::default();
        let ticket = debouncer.schedule("q").ticket;

        assert_eq!(debouncer.cancel(), Some(ticket));
        assert_eq!(debouncer.fire(ticket), None);
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.cancel(), None);
    }
}
