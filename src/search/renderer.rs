//! Whole-subtree replacement of the rows container.

use crate::dom::Dom;
use crate::domain::{ListFragment, Result};

/// Replaces every child of `container` with `fragment`.
///
/// Every listener and tooltip on the old rows goes with them, so the binders must run
/// again afterwards. On error the old rows stay displayed.
///
/// # Errors
///
/// Returns [`LiveSearchError::Markup`](crate::domain::LiveSearchError::Markup) when the
/// fragment cannot be parsed.
pub fn render<D: Dom + ?Sized>(dom: &mut D, container: &D::Node, fragment: &ListFragment) -> Result<()> {
    dom.replace_children(container, fragment.markup())?;
    tracing::debug!(bytes = fragment.markup().len(), blank = fragment.is_blank(), "rows replaced");
    Ok(())
}
