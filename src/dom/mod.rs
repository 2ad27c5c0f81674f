//! Document seam between the search components and a page.
//!
//! The components never touch a browser API directly. They talk to a [`Dom`], which
//! is implemented by the real page on wasm32 (`web::BrowserDom`) and by
//! [`MemoryDom`], an in-memory document used natively.
//!
//! # Listeners as data
//!
//! Row and dialog listeners are described by a [`Behavior`] value rather than a
//! closure. A `Dom` keeps at most one behavior per `(node, EventKind)` slot and
//! [`Dom::listen`] replaces whatever the slot held, which is what makes the binders
//! safe to re-run.
//!
//! # Modules
//!
//! - [`memory`]: Arena-backed document parsed from markup
//! - [`selector`]: Class and attribute selectors

pub mod memory;
pub mod selector;

pub use memory::{MemoryDom, NodeId};
pub use selector::Selector;

use crate::domain::Result;
use crate::search::edit_binder::{self, EditFormLayout};
use crate::search::row_binder::{self, ToolbarVisibility};
use std::fmt;

/// Events the binders attach behaviors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Pointer entered a row.
    MouseEnter,
    /// Pointer left a row.
    MouseLeave,
    /// The edit dialog is about to open (`show.bs.modal`).
    ModalShow,
}

impl EventKind {
    /// DOM event type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::ModalShow => "show.bs.modal",
        }
    }
}

/// What happens when a bound event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    /// Make the row's toolbar opaque and clickable.
    ToolbarShown { toolbar: Selector },
    /// Make the row's toolbar transparent and let clicks pass through.
    ToolbarHidden { toolbar: Selector },
    /// Copy the triggering control's record attributes into the edit form.
    PopulateEditForm(EditFormLayout),
}

impl Behavior {
    /// Runs the behavior for an event on `target`.
    ///
    /// `related` is the event's related target; for [`EventKind::ModalShow`] that is
    /// the control that opened the dialog.
    pub fn run<D: Dom + ?Sized>(&self, dom: &mut D, target: &D::Node, related: Option<&D::Node>) {
        match self {
            Self::ToolbarShown { toolbar } => {
                row_binder::set_toolbar(dom, target, toolbar, ToolbarVisibility::Shown);
            }
            Self::ToolbarHidden { toolbar } => {
                row_binder::set_toolbar(dom, target, toolbar, ToolbarVisibility::Hidden);
            }
            Self::PopulateEditForm(layout) => {
                edit_binder::populate(dom, layout, related);
            }
        }
    }
}

/// Operations the search components perform on a document.
///
/// All lookups are scoped to attached elements: once a subtree is replaced its old
/// nodes are unreachable.
pub trait Dom {
    /// Element handle.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Element with the given `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// The `<body>` element.
    fn body(&self) -> Option<Self::Node>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: &Self::Node, selector: &Selector) -> Vec<Self::Node>;

    /// First descendant of `scope` matching `selector`.
    fn query_first(&self, scope: &Self::Node, selector: &Selector) -> Option<Self::Node> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Current value of a form control.
    fn value(&self, node: &Self::Node) -> String;

    fn set_value(&mut self, node: &Self::Node, value: &str);

    /// Sets one inline style property.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Adds or removes one class token.
    fn set_class(&mut self, node: &Self::Node, class: &str, enabled: bool);

    /// Replaces every child of `container` with the elements parsed from `markup`.
    ///
    /// The swap is all-or-nothing: on error the old children stay in place.
    ///
    /// # Errors
    ///
    /// Returns [`LiveSearchError::Markup`](crate::domain::LiveSearchError::Markup) when
    /// the markup cannot be parsed.
    fn replace_children(&mut self, container: &Self::Node, markup: &str) -> Result<()>;

    /// Puts `behavior` in the `(node, kind)` listener slot, replacing any previous one.
    fn listen(&mut self, node: &Self::Node, kind: EventKind, behavior: Behavior);

    /// Gets or creates the tooltip widget for `node`.
    fn ensure_tooltip(&mut self, node: &Self::Node);

    fn focus(&mut self, node: &Self::Node);
}
