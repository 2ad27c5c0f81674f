//! In-memory document model.
//!
//! [`MemoryDom`] keeps elements in an arena and parses page and fragment markup with
//! `quick-xml`. Server templates are HTML, not XML, so the parser is configured to
//! tolerate mismatched end tags and HTML void elements (`<input>`, `<br>`, ...)
//! written without a closing slash.
//!
//! Replacing a container's children detaches the old subtree: its nodes stay in the
//! arena (so stale handles do not dangle) but are no longer reachable by lookups, and
//! their listeners and tooltips are dropped with them.

use super::{Behavior, Dom, EventKind, Selector};
use crate::domain::{LiveSearchError, Result};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Elements that never have content or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Handle to an element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: String,
    style: BTreeMap<String, String>,
    value: String,
    attached: bool,
}

impl Element {
    fn new(tag: String, attributes: Vec<(String, String)>, parent: Option<NodeId>) -> Self {
        let value = attributes
            .iter()
            .find(|(name, _)| name == "value")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();

        Self {
            tag,
            attributes,
            parent,
            children: Vec::new(),
            text: String::new(),
            style: BTreeMap::new(),
            value,
            attached: true,
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

/// Arena-backed document.
///
/// # Examples
///
/// ```
/// use livesearch::dom::{Dom, MemoryDom, Selector};
///
/// let mut dom = MemoryDom::parse(r#"<body><ul id="list"><li class="row">a</li></ul></body>"#)?;
/// let list = dom.element_by_id("list").unwrap();
/// dom.replace_children(&list, r#"<li class="row">b</li><li class="row">c</li>"#)?;
/// assert_eq!(dom.query_all(&list, &Selector::class("row")).len(), 2);
/// # Ok::<(), livesearch::LiveSearchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Element>,
    root: NodeId,
    listeners: HashMap<(NodeId, EventKind), Behavior>,
    tooltips: BTreeSet<NodeId>,
    tooltip_creations: usize,
    focused: Option<NodeId>,
}

impl MemoryDom {
    /// Parses a whole page.
    ///
    /// # Errors
    ///
    /// Returns [`LiveSearchError::Markup`] when the markup is not parseable.
    pub fn parse(markup: &str) -> Result<Self> {
        let root = Element::new("#document".to_string(), Vec::new(), None);
        let mut dom = Self {
            nodes: vec![root],
            root: NodeId(0),
            listeners: HashMap::new(),
            tooltips: BTreeSet::new(),
            tooltip_creations: 0,
            focused: None,
        };

        let children = dom.parse_fragment(dom.root, markup)?;
        dom.nodes[0].children = children;
        Ok(dom)
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// Concatenated text of the element and its attached descendants, whitespace
    /// collapsed.
    #[must_use]
    pub fn text(&self, node: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_text(node, &mut parts);
        parts.join(" ")
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Whether the node is still part of the document.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes[node.0].attached
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].style.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        Selector::class(class).matches(|name| self.nodes[node.0].attribute(name))
    }

    /// Behavior in the `(node, kind)` slot.
    #[must_use]
    pub fn listener(&self, node: NodeId, kind: EventKind) -> Option<&Behavior> {
        self.listeners.get(&(node, kind))
    }

    /// Number of occupied listener slots.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Live tooltip widgets.
    #[must_use]
    pub fn tooltip_count(&self) -> usize {
        self.tooltips.len()
    }

    /// Tooltip widgets ever created, including those dropped with their rows.
    #[must_use]
    pub const fn tooltip_creations(&self) -> usize {
        self.tooltip_creations
    }

    #[must_use]
    pub fn has_tooltip(&self, node: NodeId) -> bool {
        self.tooltips.contains(&node)
    }

    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Fires `kind` on `node`, running the bound behavior if there is one.
    ///
    /// Returns whether a behavior ran.
    pub fn dispatch(&mut self, node: NodeId, kind: EventKind, related: Option<NodeId>) -> bool {
        let Some(behavior) = self.listeners.get(&(node, kind)).cloned() else {
            tracing::trace!(?node, kind = kind.as_str(), "no listener bound");
            return false;
        };

        behavior.run(self, &node, related.as_ref());
        true
    }

    fn collect_text(&self, node: NodeId, parts: &mut Vec<String>) {
        let element = &self.nodes[node.0];
        let text = element.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            parts.push(text);
        }
        for child in &element.children {
            self.collect_text(*child, parts);
        }
    }

    /// Attached descendants of `scope` in document order.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0].children.iter().rev().copied().collect();

        while let Some(node) = stack.pop() {
            let element = &self.nodes[node.0];
            if !element.attached {
                continue;
            }
            out.push(node);
            stack.extend(element.children.iter().rev().copied());
        }

        out
    }

    fn push_element(&mut self, start: &BytesStart<'_>, parent: NodeId) -> Result<NodeId> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();

        let mut attributes = Vec::new();
        for attribute in start.html_attributes() {
            let attribute =
                attribute.map_err(|e| LiveSearchError::Markup(format!("<{tag}>: {e}")))?;
            let name = String::from_utf8_lossy(attribute.key.as_ref()).to_ascii_lowercase();
            let raw = String::from_utf8_lossy(&attribute.value);
            let value = quick_xml::escape::unescape(&raw)
                .map_or_else(|_| raw.to_string(), |v| v.into_owned());
            attributes.push((name, value));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Element::new(tag, attributes, Some(parent)));
        Ok(id)
    }

    /// Parses `markup` into new nodes whose parent is `parent`.
    ///
    /// Returns the top-level nodes without linking them into `parent.children`. On error
    /// the arena is truncated back, so a failed parse leaves no trace.
    fn parse_fragment(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>> {
        let checkpoint = self.nodes.len();
        let result = self.parse_fragment_inner(parent, markup);
        if result.is_err() {
            self.nodes.truncate(checkpoint);
        }
        result
    }

    fn parse_fragment_inner(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().check_end_names = false;

        let mut top_level = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                LiveSearchError::Markup(format!("at byte {}: {e}", reader.buffer_position()))
            })?;

            let opens = matches!(event, Event::Start(_));
            match event {
                Event::Start(start) | Event::Empty(start) => {
                    let current = open.last().copied().unwrap_or(parent);
                    let id = self.push_element(&start, current)?;
                    if current == parent {
                        top_level.push(id);
                    } else {
                        self.nodes[current.0].children.push(id);
                    }

                    let is_void = VOID_ELEMENTS.contains(&self.nodes[id.0].tag.as_str());
                    if opens && !is_void {
                        open.push(id);
                    }
                }
                Event::End(end) => {
                    let tag = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                    // Close up to the nearest matching open element; stray end tags are ignored.
                    if let Some(pos) = open.iter().rposition(|n| self.nodes[n.0].tag == tag) {
                        open.truncate(pos);
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = open.last() {
                        self.nodes[current.0].text.push_str(&String::from_utf8_lossy(&text));
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(current) = open.last() {
                        self.nodes[current.0].text.push_str(&resolve_reference(&reference));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(top_level)
    }

    fn detach_subtree(&mut self, root: NodeId) {
        let mut detached = HashSet::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            let element = &mut self.nodes[node.0];
            element.attached = false;
            detached.insert(node);
            stack.extend(element.children.iter().copied());
        }

        self.listeners.retain(|(node, _), _| !detached.contains(node));
        self.tooltips.retain(|node| !detached.contains(node));
        if self.focused.is_some_and(|f| detached.contains(&f)) {
            self.focused = None;
        }
    }
}

/// Text for `&name;` or `&#n;`. Unknown entities are kept as written.
fn resolve_reference(reference: &BytesRef<'_>) -> String {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return ch.to_string();
    }
    let bytes: &[u8] = reference;
    let name = String::from_utf8_lossy(bytes);
    resolve_predefined_entity(&name).map_or_else(|| format!("&{name};"), str::to_string)
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.nodes[node.0].attribute("id").as_deref() == Some(id))
    }

    fn body(&self) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.nodes[node.0].tag == "body")
    }

    fn query_all(&self, scope: &NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .filter(|node| selector.matches(|name| self.nodes[node.0].attribute(name)))
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attribute(name)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let element = &mut self.nodes[node.0];
        match element.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn value(&self, node: &NodeId) -> String {
        self.nodes[node.0].value.clone()
    }

    fn set_value(&mut self, node: &NodeId, value: &str) {
        self.nodes[node.0].value = value.to_string();
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        self.nodes[node.0]
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn set_class(&mut self, node: &NodeId, class: &str, enabled: bool) {
        let current = self.nodes[node.0].attribute("class").unwrap_or_default();
        let mut tokens: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
        if enabled {
            tokens.push(class);
        }
        let joined = tokens.join(" ");
        self.set_attribute(node, "class", &joined);
    }

    fn replace_children(&mut self, container: &NodeId, markup: &str) -> Result<()> {
        let replacement = self.parse_fragment(*container, markup)?;

        let old = std::mem::take(&mut self.nodes[container.0].children);
        for child in old {
            self.detach_subtree(child);
        }

        let element = &mut self.nodes[container.0];
        element.text.clear();
        element.children = replacement;
        Ok(())
    }

    fn listen(&mut self, node: &NodeId, kind: EventKind, behavior: Behavior) {
        if !self.is_attached(*node) {
            tracing::debug!(?node, "ignoring listener on detached node");
            return;
        }
        self.listeners.insert((*node, kind), behavior);
    }

    fn ensure_tooltip(&mut self, node: &NodeId) {
        if self.tooltips.insert(*node) {
            self.tooltip_creations += 1;
        }
    }

    fn focus(&mut self, node: &NodeId) {
        self.focused = Some(*node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body class="page">
  <form id="search"><input type="text" name="q" value="pen"><button id="clear" type="button">x</button></form>
  <table><tbody id="rows">
    <tr class="row"><td>Pen</td><td><div class="toolbar"><button data-id="1">edit</button></div></td></tr>
  </tbody></table>
</body></html>"#;

    #[test]
    fn parses_void_inputs_and_initial_value() {
        let dom = MemoryDom::parse(PAGE).unwrap();
        let form = dom.element_by_id("search").unwrap();
        let input = dom
            .query_first(&form, &Selector::attribute("name", "q"))
            .unwrap();

        assert_eq!(dom.tag(input), "input");
        assert_eq!(dom.value(&input), "pen");
        // The button after the void input is a sibling, not a child of it.
        assert!(dom.children(input).is_empty());
        assert!(dom.element_by_id("clear").is_some());
    }

    #[test]
    fn replace_children_detaches_old_subtree() {
        let mut dom = MemoryDom::parse(PAGE).unwrap();
        let rows = dom.element_by_id("rows").unwrap();
        let old_row = dom.query_first(&rows, &Selector::class("row")).unwrap();
        dom.listen(
            &old_row,
            EventKind::MouseEnter,
            Behavior::ToolbarShown {
                toolbar: Selector::class("toolbar"),
            },
        );
        dom.ensure_tooltip(&old_row);

        dom.replace_children(&rows, r#"<tr class="row"><td>Ink</td></tr>"#)
            .unwrap();

        assert!(!dom.is_attached(old_row));
        assert_eq!(dom.listener_count(), 0);
        assert_eq!(dom.tooltip_count(), 0);
        let current = dom.query_all(&rows, &Selector::class("row"));
        assert_eq!(current.len(), 1);
        assert_eq!(dom.text(current[0]), "Ink");
    }

    #[test]
    fn failed_parse_keeps_old_children() {
        let mut dom = MemoryDom::parse(PAGE).unwrap();
        let rows = dom.element_by_id("rows").unwrap();
        let before = dom.query_all(&rows, &Selector::class("row"));

        let result = dom.replace_children(&rows, r#"<tr class="row" data-id="1></tr>"#);

        assert!(matches!(result, Err(LiveSearchError::Markup(_))));
        assert_eq!(dom.query_all(&rows, &Selector::class("row")), before);
    }

    #[test]
    fn empty_fragment_clears_container() {
        let mut dom = MemoryDom::parse(PAGE).unwrap();
        let rows = dom.element_by_id("rows").unwrap();

        dom.replace_children(&rows, "  \n ").unwrap();

        assert!(dom.children(rows).is_empty());
    }

    #[test]
    fn attribute_entities_are_unescaped() {
        let dom = MemoryDom::parse(r#"<p id="p" data-item="Tom &amp; Jerry"></p>"#).unwrap();
        let p = dom.element_by_id("p").unwrap();
        assert_eq!(dom.attribute(&p, "data-item").as_deref(), Some("Tom & Jerry"));
    }

    #[test]
    fn text_entities_are_resolved() {
        let dom = MemoryDom::parse(
            r#"<body><p id="a">Tom &amp; Jerry</p><p id="b">AT&amp;T &lt;3 &#39;ok&#x27;</p></body>"#,
        )
        .unwrap();

        let text = |id: &str| dom.text(dom.element_by_id(id).unwrap());
        assert_eq!(text("a"), "Tom & Jerry");
        assert_eq!(text("b"), "AT&T <3 'ok'");
    }

    #[test]
    fn set_class_toggles_token() {
        let mut dom = MemoryDom::parse(PAGE).unwrap();
        let body = dom.body().unwrap();

        dom.set_class(&body, "dark", true);
        assert!(dom.has_class(body, "dark"));
        assert!(dom.has_class(body, "page"));

        dom.set_class(&body, "dark", false);
        assert!(!dom.has_class(body, "dark"));
    }

    #[test]
    fn listen_replaces_slot() {
        let mut dom = MemoryDom::parse(PAGE).unwrap();
        let rows = dom.element_by_id("rows").unwrap();
        let row = dom.query_first(&rows, &Selector::class("row")).unwrap();
        let shown = Behavior::ToolbarShown {
            toolbar: Selector::class("toolbar"),
        };

        dom.listen(&row, EventKind::MouseEnter, shown.clone());
        dom.listen(&row, EventKind::MouseEnter, shown.clone());

        assert_eq!(dom.listener_count(), 1);
        assert_eq!(dom.listener(row, EventKind::MouseEnter), Some(&shown));
    }
}
