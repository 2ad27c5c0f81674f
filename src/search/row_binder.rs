//! Hover toolbars on every row, tooltips on every marked element of the page.
//!
//! Binding writes into the `(row, mouseenter)` and `(row, mouseleave)` listener slots
//! and asks for tooltips with get-or-create semantics, so running it again on the
//! same rows changes nothing. Hover listeners are scoped to the rows container;
//! tooltips are activated across the whole `<body>` (header buttons, theme toggle).

use crate::dom::{Behavior, Dom, EventKind, Selector};
use crate::PageLayout;

/// Toolbar state driven by hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarVisibility {
    /// Opaque and clickable.
    Shown,
    /// Transparent and not intercepting clicks.
    Hidden,
}

impl ToolbarVisibility {
    /// `(opacity, pointer-events)` values.
    #[must_use]
    pub const fn style(self) -> (&'static str, &'static str) {
        match self {
            Self::Shown => ("1", "auto"),
            Self::Hidden => ("0", "none"),
        }
    }
}

/// Applies `visibility` to the toolbar inside `row`.
///
/// A row without a toolbar is skipped.
pub fn set_toolbar<D: Dom + ?Sized>(
    dom: &mut D,
    row: &D::Node,
    toolbar: &Selector,
    visibility: ToolbarVisibility,
) {
    let Some(target) = dom.query_first(row, toolbar) else {
        tracing::debug!(%toolbar, "row has no toolbar");
        return;
    };

    let (opacity, pointer_events) = visibility.style();
    dom.set_style(&target, "opacity", opacity);
    dom.set_style(&target, "pointer-events", pointer_events);
}

/// Attaches hover behavior to every row of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBehaviorBinder {
    row: Selector,
    toolbar: Selector,
    tooltip: Selector,
}

impl RowBehaviorBinder {
    #[must_use]
    pub fn new(layout: &PageLayout) -> Self {
        Self {
            row: Selector::class(&layout.row_class),
            toolbar: Selector::class(&layout.toolbar_class),
            tooltip: layout.tooltip_marker.clone(),
        }
    }

    /// Binds every row in `container` and activates every tooltip on the page.
    ///
    /// Returns the row count. A document without `<body>` falls back to the container
    /// for tooltips.
    pub fn bind<D: Dom + ?Sized>(&self, dom: &mut D, container: &D::Node) -> usize {
        let rows = dom.query_all(container, &self.row);
        for row in &rows {
            dom.listen(
                row,
                EventKind::MouseEnter,
                Behavior::ToolbarShown { toolbar: self.toolbar.clone() },
            );
            dom.listen(
                row,
                EventKind::MouseLeave,
                Behavior::ToolbarHidden { toolbar: self.toolbar.clone() },
            );
        }

        let scope = dom.body().unwrap_or_else(|| container.clone());
        let tooltips = dom.query_all(&scope, &self.tooltip);
        for element in &tooltips {
            dom.ensure_tooltip(element);
        }

        tracing::debug!(rows = rows.len(), tooltips = tooltips.len(), "rows bound");
        rows.len()
    }
}
