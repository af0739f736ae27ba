//! Document capability
//!
//! Effects never talk to a concrete page. They are written against the
//! [`Document`] trait, which exposes just enough of an element tree to read
//! attributes, write inline styles and markup, and locate targets.
//!
//! A browser binding implements the trait on top of real elements; headless
//! runs and tests use [`DocumentTree`](crate::DocumentTree).

use slotmap::new_key_type;

use crate::geometry::Rect;
use crate::markup;
use crate::selector::Selector;

new_key_type! {
    /// Opaque handle to an element in a document
    pub struct NodeId;
}

/// Element-handle capability required by the effect engines
pub trait Document {
    /// All attached elements in document (pre-order) order
    fn nodes(&self) -> Vec<NodeId>;

    /// Whether the handle refers to an element of this document
    fn contains(&self, node: NodeId) -> bool;

    /// Lowercase tag name
    fn tag(&self, node: NodeId) -> Option<String>;

    /// Parent element, if any
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Inline style property value
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// Inner markup (rich text) of the element
    fn inner_markup(&self, node: NodeId) -> Option<String>;

    fn set_inner_markup(&mut self, node: NodeId, markup: String);

    /// Layout rect in page coordinates; `None` when the element has no box
    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;

    /// Replace the element's content with escaped plain text
    fn set_text(&mut self, node: NodeId, text: &str) {
        self.set_inner_markup(node, markup::escape_text(text));
    }

    /// Plain text content with markup stripped
    fn text_content(&self, node: NodeId) -> Option<String> {
        self.inner_markup(node).map(|m| markup::plain_text(&m))
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// All elements matching the selector, in document order
    fn select_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.nodes()
            .into_iter()
            .filter(|&node| selector.matches(self, node))
            .collect()
    }

    /// First element matching the selector
    fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        self.nodes()
            .into_iter()
            .find(|&node| selector.matches(self, node))
    }

    /// First descendant of `scope` matching the selector
    fn select_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(scope).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if selector.matches(self, node) {
                return Some(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        None
    }
}
