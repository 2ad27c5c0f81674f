//! Browser shim: the WebAssembly entry point and the `web-sys` implementations of
//! the crate's seams.
//!
//! On start the module reads the configuration from the search form's data
//! attributes, installs tracing, wires the theme toggle, and mounts the
//! [`SearchController`] when the page has a search form. Pages without one only get
//! the theme.
//!
//! Scripts that replace rows on their own call `initRowToolbar()` (exported, and set
//! on `window`) to re-bind hover toolbars and tooltips.
//!
//! # Modules
//!
//! - [`dom`]: [`BrowserDom`], the live page behind the `Dom` trait
//! - [`host`]: Timers, `fetch` and history behind the `Host` trait
//! - [`preferences`]: `localStorage` preference store

pub mod dom;
pub mod host;
pub mod preferences;

pub use dom::BrowserDom;
pub use host::{BrowserHost, Dispatcher, HttpFetcher};
pub use preferences::LocalStoragePreferences;

use crate::dom::Dom;
use crate::observability::init_tracing;
use crate::search::PartialFetcher;
use crate::theme::ThemeState;
use crate::{Config, Event, PageLayout, SearchController};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, EventTarget, KeyboardEvent, Window};

/// The controller type mounted on a real page.
pub type PageController = SearchController<BrowserDom, BrowserHost>;

thread_local! {
    static PAGE: RefCell<Option<Rc<RefCell<PageController>>>> = const { RefCell::new(None) };
}

/// Module entry point. Runs once the document has been parsed.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let target: EventTarget = document.clone().into();
        listen(&target, "DOMContentLoaded", move |_: web_sys::Event| {
            if let Err(e) = boot(&window, &document) {
                web_sys::console::error_1(&e);
            }
        })?;
        return Ok(());
    }

    boot(&window, &document)
}

fn boot(window: &Window, document: &Document) -> Result<(), JsValue> {
    let dom = BrowserDom::new(document.clone());
    let config = read_config(&dom);
    init_tracing(&config);

    start_theme(window, &dom, &config.layout)?;
    start_search(window, dom, &config)
}

/// Re-binds row toolbars and tooltips on the mounted page. Returns the row count, or
/// zero when no search is mounted or the controller is busy.
#[wasm_bindgen(js_name = initRowToolbar)]
pub fn init_row_toolbar() -> usize {
    PAGE.with(|page| {
        let Some(controller) = page.borrow().clone() else {
            tracing::debug!("initRowToolbar called without a mounted search");
            return 0;
        };
        let Ok(mut controller) = controller.try_borrow_mut() else {
            tracing::warn!("controller busy, skipping initRowToolbar");
            return 0;
        };
        controller.rebind_rows()
    })
}

/// Exposes [`init_row_toolbar`] as `window.initRowToolbar` for non-module scripts.
fn expose_row_toolbar(window: &Window) -> Result<(), JsValue> {
    let callback = Closure::<dyn Fn() -> usize>::new(init_row_toolbar);
    js_sys::Reflect::set(window, &JsValue::from_str("initRowToolbar"), callback.as_ref())?;
    // Lives as long as the page.
    callback.forget();
    Ok(())
}

/// Configuration from the search form: a `data-config` JSON object, or the individual
/// `data-debounce-ms` / `data-trace-level` attributes.
fn read_config(dom: &BrowserDom) -> Config {
    let form_id = PageLayout::default().search_form;
    let Some(form) = dom.element_by_id(&form_id) else {
        return Config::default();
    };

    if let Some(json) = dom.attribute(&form, "data-config") {
        match Config::from_json(&json) {
            Ok(config) => return config,
            Err(e) => web_sys::console::warn_1(&JsValue::from_str(&format!(
                "livesearch: ignoring data-config: {e}"
            ))),
        }
    }

    let map: BTreeMap<String, String> = [("debounce_ms", "data-debounce-ms"), ("trace_level", "data-trace-level")]
        .into_iter()
        .filter_map(|(key, attribute)| dom.attribute(&form, attribute).map(|v| (key.to_string(), v)))
        .collect();
    Config::from_map(&map)
}

fn start_theme(window: &Window, dom: &BrowserDom, layout: &PageLayout) -> Result<(), JsValue> {
    let prefers_dark = window
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());

    let theme = ThemeState::init(LocalStoragePreferences::new(window), &layout.theme_key, prefers_dark);
    let mut page = dom.clone();
    theme.apply(&mut page, &layout.theme_icon);

    let Some(toggle) = dom.element_by_id(&layout.theme_toggle) else {
        return Ok(());
    };

    let icon = layout.theme_icon.clone();
    let theme = RefCell::new(theme);
    listen(&toggle, "click", move |_: web_sys::Event| {
        let mut theme = theme.borrow_mut();
        theme.toggle();
        theme.apply(&mut page, &icon);
    })
}

fn start_search(window: &Window, dom: BrowserDom, config: &Config) -> Result<(), JsValue> {
    let dispatcher = Dispatcher::default();
    let fetcher: Rc<dyn PartialFetcher> = Rc::new(HttpFetcher::new(window.clone()));
    let host = BrowserHost::new(window.clone(), dispatcher.clone(), fetcher);
    let href = window.location().href()?;

    let Some(form) = dom.element_by_id(&config.layout.search_form) else {
        return Ok(());
    };
    let Some(controller) = SearchController::mount(config, dom.clone(), host, &href) else {
        return Ok(());
    };

    let input = controller.input().clone();
    let clear_button = controller.clear_button().cloned();
    let controller = Rc::new(RefCell::new(controller));
    dispatcher.attach(&controller);
    PAGE.with(|page| *page.borrow_mut() = Some(controller));
    expose_row_toolbar(window)?;

    let on_input = dispatcher.clone();
    let source = input.clone();
    listen(&input, "input", move |_: web_sys::Event| {
        on_input.dispatch(Event::Input { value: dom.value(&source) });
    })?;

    let on_key = dispatcher.clone();
    listen(&input, "keyup", move |event: KeyboardEvent| {
        if event.key() == "Escape" {
            on_key.dispatch(Event::Escape);
        }
    })?;

    if let Some(button) = clear_button {
        let on_clear = dispatcher.clone();
        listen(&button, "click", move |_: web_sys::Event| on_clear.dispatch(Event::Clear))?;
    }

    listen(&form, "submit", move |event: web_sys::Event| {
        event.prevent_default();
        dispatcher.dispatch(Event::Submit);
    })
}

/// Adds a page-lifetime listener.
fn listen<E, F>(target: &EventTarget, kind: &str, handler: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    // Page-lifetime listeners are never removed.
    closure.forget();
    Ok(())
}
