//! [`Dom`] over the live page.

use crate::dom::{Behavior, Dom, EventKind, Selector};
use crate::domain::{LiveSearchError, Result};
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

#[wasm_bindgen]
extern "C" {
    /// `bootstrap.Tooltip.getOrCreateInstance(element)`
    #[wasm_bindgen(js_namespace = ["bootstrap", "Tooltip"], js_name = getOrCreateInstance, catch)]
    fn tooltip_get_or_create(element: &Element) -> std::result::Result<JsValue, JsValue>;
}

/// Property on an element that holds the listener bound to one [`EventKind`] slot.
fn slot_key(kind: EventKind) -> JsValue {
    JsValue::from_str(&format!("__livesearch_{}", kind.as_str()))
}

/// The page document. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BrowserDom {
    document: Document,
}

impl BrowserDom {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for BrowserDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn query_all(&self, scope: &Element, selector: &Selector) -> Vec<Element> {
        let Ok(list) = scope.query_selector_all(&selector.to_css()) else {
            tracing::warn!(%selector, "invalid selector");
            return Vec::new();
        };

        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(e) = node.set_attribute(name, value) {
            tracing::warn!(%name, error = ?e, "set_attribute failed");
        }
    }

    fn value(&self, node: &Element) -> String {
        Reflect::get(node, &JsValue::from_str("value"))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }

    fn set_value(&mut self, node: &Element, value: &str) {
        if let Err(e) = Reflect::set(node, &JsValue::from_str("value"), &JsValue::from_str(value)) {
            tracing::warn!(error = ?e, "setting value failed");
        }
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(e) = element.style().set_property(property, value) {
            tracing::warn!(%property, error = ?e, "set_style failed");
        }
    }

    fn set_class(&mut self, node: &Element, class: &str, enabled: bool) {
        if let Err(e) = node.class_list().toggle_with_force(class, enabled) {
            tracing::warn!(%class, error = ?e, "class toggle failed");
        }
    }

    fn replace_children(&mut self, container: &Element, markup: &str) -> Result<()> {
        // innerHTML swaps the whole subtree in one step; the browser never shows a mix.
        container.set_inner_html(markup);
        Ok(())
    }

    fn listen(&mut self, node: &Element, kind: EventKind, behavior: Behavior) {
        if let Err(e) = self.replace_listener(node, kind, behavior) {
            tracing::warn!(event = kind.as_str(), error = %e, "listener not bound");
        }
    }

    fn ensure_tooltip(&mut self, node: &Element) {
        if let Err(e) = tooltip_get_or_create(node) {
            tracing::debug!(error = ?e, "tooltip widget unavailable");
        }
    }

    fn focus(&mut self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            if let Err(e) = element.focus() {
                tracing::debug!(error = ?e, "focus failed");
            }
        }
    }
}

impl BrowserDom {
    /// Removes the listener stored in the `(node, kind)` slot and installs a new one.
    fn replace_listener(&self, node: &Element, kind: EventKind, behavior: Behavior) -> Result<()> {
        let key = slot_key(kind);
        let host_error = |e: JsValue| LiveSearchError::Host(format!("{e:?}"));

        let previous = Reflect::get(node, &key).map_err(host_error)?;
        if let Some(callback) = previous.dyn_ref::<js_sys::Function>() {
            node.remove_event_listener_with_callback(kind.as_str(), callback)
                .map_err(host_error)?;
        }

        let mut dom = self.clone();
        let target = node.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let related = Reflect::get(&event, &JsValue::from_str("relatedTarget"))
                .ok()
                .and_then(|value| value.dyn_into::<Element>().ok());
            behavior.run(&mut dom, &target, related.as_ref());
        });
        let callback = closure.into_js_value();

        node.add_event_listener_with_callback(kind.as_str(), callback.unchecked_ref())
            .map_err(host_error)?;
        Reflect::set(node, &key, &callback).map_err(host_error)?;
        Ok(())
    }
}
