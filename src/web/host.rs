//! Browser timers, fetches and history behind [`Host`].

use super::PageController;
use crate::app::Event;
use crate::domain::{FetchFailure, ListFragment, LiveSearchError, Result};
use crate::runtime::Host;
use crate::search::fetcher::{self, interpret_response};
use crate::search::{FetchRequest, PartialFetcher, Ticket, PARTIAL_HEADER};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

fn host_error(e: JsValue) -> LiveSearchError {
    LiveSearchError::Host(format!("{e:?}"))
}

/// Routes timer and fetch callbacks back into the page's controller.
///
/// Holds the controller weakly; callbacks that outlive it are dropped.
#[derive(Clone, Default)]
pub struct Dispatcher(Rc<RefCell<Weak<RefCell<PageController>>>>);

impl Dispatcher {
    pub fn attach(&self, controller: &Rc<RefCell<PageController>>) {
        *self.0.borrow_mut() = Rc::downgrade(controller);
    }

    pub fn dispatch(&self, event: Event) {
        let controller = self.0.borrow().upgrade();
        let Some(controller) = controller else {
            tracing::debug!(event = event.name(), "no controller attached, dropping event");
            return;
        };

        // Callbacks run from the browser event loop, never inside another dispatch.
        match controller.try_borrow_mut() {
            Ok(mut controller) => controller.dispatch(event),
            Err(_) => tracing::warn!(event = event.name(), "controller busy, dropping event"),
        };
    }
}

/// [`Host`] backed by `window`.
pub struct BrowserHost {
    window: Window,
    dispatcher: Dispatcher,
    fetcher: Rc<dyn PartialFetcher>,
    timers: HashMap<Ticket, i32>,
}

impl BrowserHost {
    pub fn new(window: Window, dispatcher: Dispatcher, fetcher: Rc<dyn PartialFetcher>) -> Self {
        Self {
            window,
            dispatcher,
            fetcher,
            timers: HashMap::new(),
        }
    }
}

impl Host for BrowserHost {
    fn arm_timer(&mut self, ticket: Ticket, delay: Duration) -> Result<()> {
        // Older tickets have fired or been cancelled already.
        self.timers.retain(|armed, _| *armed > ticket);

        let dispatcher = self.dispatcher.clone();
        let callback = Closure::once_into_js(move || {
            dispatcher.dispatch(Event::DebounceElapsed { ticket });
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
            .map_err(host_error)?;
        self.timers.insert(ticket, handle);
        Ok(())
    }

    fn cancel_timer(&mut self, ticket: Ticket) -> Result<()> {
        if let Some(handle) = self.timers.remove(&ticket) {
            self.window.clear_timeout_with_handle(handle);
        }
        Ok(())
    }

    fn start_fetch(&mut self, request: FetchRequest) -> Result<()> {
        let dispatcher = self.dispatcher.clone();
        let completion = fetcher::complete(self.fetcher.as_ref(), request);

        wasm_bindgen_futures::spawn_local(async move {
            let event = completion.await;
            dispatcher.dispatch(event);
        });
        Ok(())
    }

    fn replace_location(&mut self, url: &Url) -> Result<()> {
        self.window
            .history()
            .map_err(host_error)?
            .replace_state_with_url(&JsValue::NULL, "", Some(url.as_str()))
            .map_err(host_error)
    }
}

/// [`PartialFetcher`] using `window.fetch`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    window: Window,
}

impl HttpFetcher {
    #[must_use]
    pub const fn new(window: Window) -> Self {
        Self { window }
    }
}

fn network(e: JsValue) -> FetchFailure {
    FetchFailure::Network(format!("{e:?}"))
}

impl PartialFetcher for HttpFetcher {
    fn fetch(&self, request: &FetchRequest) -> LocalBoxFuture<'static, std::result::Result<ListFragment, FetchFailure>> {
        let window = self.window.clone();
        let url = request.url.to_string();

        async move {
            let headers = Headers::new().map_err(network)?;
            headers.set(PARTIAL_HEADER.0, PARTIAL_HEADER.1).map_err(network)?;

            let init = RequestInit::new();
            init.set_method("GET");
            init.set_headers(&headers);

            let request = Request::new_with_str_and_init(&url, &init).map_err(network)?;
            let response: Response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(network)?
                .dyn_into()
                .map_err(network)?;

            let status = response.status();
            let body = JsFuture::from(response.text().map_err(network)?)
                .await
                .map_err(network)?
                .as_string()
                .unwrap_or_default();

            interpret_response(status, body)
        }
        .boxed_local()
    }
}
