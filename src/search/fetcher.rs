//! Partial (rows-only) requests.
//!
//! A partial request is an ordinary `GET` of the current page address with the
//! query substituted, marked by [`PARTIAL_HEADER`] so the server answers with the
//! row markup alone instead of a full page.
//!
//! The transport lives behind [`PartialFetcher`]; the browser implementation is
//! `web::HttpFetcher`. Everything here is single-threaded, hence `LocalBoxFuture`.

use crate::app::Event;
use crate::domain::{FetchFailure, ListFragment};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use std::fmt;
use std::rc::Rc;
use url::Url;

/// Header marking a request as partial.
pub const PARTIAL_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Monotonically increasing number stamped on every dispatched fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// The sequence number after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One fetch as dispatched by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: RequestSeq,
    /// Query the request was issued for; compared against the current query on completion.
    pub query: String,
    /// Page address with the query parameter set.
    pub url: Url,
}

/// Issues partial requests.
pub trait PartialFetcher {
    /// Fetches the row markup for `request.url`.
    fn fetch(&self, request: &FetchRequest)
        -> LocalBoxFuture<'static, Result<ListFragment, FetchFailure>>;
}

impl<F: PartialFetcher + ?Sized> PartialFetcher for Rc<F> {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> LocalBoxFuture<'static, Result<ListFragment, FetchFailure>> {
        (**self).fetch(request)
    }
}

/// Maps an HTTP status and body to a fetch outcome.
///
/// Only 2xx counts as success; any other status leaves the displayed list alone.
///
/// ```
/// use livesearch::domain::FetchFailure;
/// use livesearch::search::fetcher::interpret_response;
///
/// assert!(interpret_response(200, "<tr></tr>".into()).is_ok());
/// assert_eq!(interpret_response(500, String::new()), Err(FetchFailure::Status(500)));
/// ```
pub fn interpret_response(status: u16, body: String) -> Result<ListFragment, FetchFailure> {
    if (200..300).contains(&status) {
        Ok(ListFragment::new(body))
    } else {
        Err(FetchFailure::Status(status))
    }
}

/// Runs `request` to completion and turns the outcome into the event the controller
/// consumes.
pub fn complete<F>(fetcher: &F, request: FetchRequest) -> LocalBoxFuture<'static, Event>
where
    F: PartialFetcher + ?Sized,
{
    let started = Utc::now();
    let pending = fetcher.fetch(&request);

    async move {
        let outcome = pending.await;
        let elapsed_ms = (Utc::now() - started).num_milliseconds();

        match &outcome {
            Ok(fragment) => tracing::debug!(
                seq = request.seq.get(),
                elapsed_ms,
                bytes = fragment.markup().len(),
                "partial fetch completed"
            ),
            Err(failure) => tracing::debug!(
                seq = request.seq.get(),
                elapsed_ms,
                error = %failure,
                "partial fetch failed"
            ),
        }

        Event::FetchCompleted {
            seq: request.seq,
            query: request.query,
            outcome,
        }
    }
    .boxed_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future;
    use std::cell::RefCell;

    struct StubFetcher {
        answer: Result<ListFragment, FetchFailure>,
        seen: RefCell<Vec<Url>>,
    }

    impl PartialFetcher for StubFetcher {
        fn fetch(
            &self,
            request: &FetchRequest,
        ) -> LocalBoxFuture<'static, Result<ListFragment, FetchFailure>> {
            self.seen.borrow_mut().push(request.url.clone());
            future::ready(self.answer.clone()).boxed_local()
        }
    }

    fn request(seq: u64, query: &str) -> FetchRequest {
        let mut url = Url::parse("https://shop.test/transactions").unwrap();
        url.query_pairs_mut().append_pair("q", query);
        FetchRequest {
            seq: RequestSeq(seq),
            query: query.to_string(),
            url,
        }
    }

    #[test]
    fn status_boundaries() {
        assert!(interpret_response(204, String::new()).is_ok());
        assert!(interpret_response(299, String::new()).is_ok());
        assert_eq!(interpret_response(199, String::new()), Err(FetchFailure::Status(199)));
        assert_eq!(interpret_response(304, String::new()), Err(FetchFailure::Status(304)));
        assert_eq!(interpret_response(404, String::new()), Err(FetchFailure::Status(404)));
    }

    #[test]
    fn complete_carries_seq_and_query() {
        let fetcher = StubFetcher {
            answer: Ok(ListFragment::new("<tr></tr>")),
            seen: RefCell::new(Vec::new()),
        };

        let event = complete(&fetcher, request(3, "pen")).now_or_never().unwrap();

        assert_eq!(
            event,
            Event::FetchCompleted {
                seq: RequestSeq(3),
                query: "pen".into(),
                outcome: Ok(ListFragment::new("<tr></tr>")),
            }
        );
        assert_eq!(fetcher.seen.borrow()[0].query(), Some("q=pen"));
    }

    #[test]
    fn complete_passes_failure_through() {
        let fetcher = Rc::new(StubFetcher {
            answer: Err(FetchFailure::Network("offline".into())),
            seen: RefCell::new(Vec::new()),
        });

        let event = complete(&fetcher, request(1, "")).now_or_never().unwrap();

        assert!(matches!(
            event,
            Event::FetchCompleted { outcome: Err(FetchFailure::Network(_)), .. }
        ));
    }

    #[test]
    fn seq_orders() {
        let first = RequestSeq::default().next();
        assert!(first.next() > first);
        assert_eq!(first.to_string(), "#1");
    }
}
