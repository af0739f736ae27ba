//! In-memory document tree
//!
//! A slotmap-backed element tree implementing [`Document`]. It has no markup
//! parser: element content is an opaque markup string, and structure is built
//! through [`DocumentTree::append`].

use indexmap::IndexMap;
use slotmap::SlotMap;

use crate::dom::{Document, NodeId};
use crate::geometry::Rect;
use crate::markup;

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    markup: String,
    rect: Option<Rect>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            markup: String::new(),
            rect: None,
        }
    }
}

/// Element tree rooted at a `body` element
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: SlotMap<NodeId, ElementData>,
    root: NodeId,
}

impl DocumentTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(ElementData::new("body"));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(ElementData::new(tag))
    }

    /// Attach `child` as the last child of `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(parent) || !self.nodes.contains_key(child)
        {
            return;
        }

        if let Some(old_parent) = self.nodes[child].parent.take() {
            if let Some(data) = self.nodes.get_mut(old_parent) {
                data.children.retain(|&c| c != child);
            }
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Create an element under `parent` and return a builder for it
    pub fn append(&mut self, parent: NodeId, tag: &str) -> ElementBuilder<'_> {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        ElementBuilder { tree: self, node }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.rect = Some(rect);
        }
    }

    /// All inline style properties in insertion order
    pub fn styles(&self, node: NodeId) -> Option<&IndexMap<String, String>> {
        self.nodes.get(node).map(|data| &data.styles)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for DocumentTree {
    fn nodes(&self) -> Vec<NodeId> {
        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            ordered.push(node);
            if let Some(data) = self.nodes.get(node) {
                stack.extend(data.children.iter().rev().copied());
            }
        }
        ordered
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn tag(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node).map(|data| data.tag.clone())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|data| data.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(node)
            .and_then(|data| data.attributes.get(name).cloned())
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(node)
            .and_then(|data| data.styles.get(property).cloned())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn inner_markup(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node).map(|data| data.markup.clone())
    }

    fn set_inner_markup(&mut self, node: NodeId, markup: String) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.markup = markup;
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(node).and_then(|data| data.rect)
    }
}

/// Fluent configuration of a freshly appended element
pub struct ElementBuilder<'a> {
    tree: &'a mut DocumentTree,
    node: NodeId,
}

impl<'a> ElementBuilder<'a> {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class, keeping any existing ones
    pub fn class(self, class: &str) -> Self {
        let classes = match self.tree.attribute(self.node, "class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.attr("class", &classes)
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.tree.set_attribute(self.node, name, value);
        self
    }

    pub fn style(self, property: &str, value: &str) -> Self {
        self.tree.set_style(self.node, property, value);
        self
    }

    /// Set raw inner markup
    pub fn markup(self, markup: &str) -> Self {
        self.tree.set_inner_markup(self.node, markup.to_string());
        self
    }

    /// Set escaped text content
    pub fn text(self, text: &str) -> Self {
        self.tree
            .set_inner_markup(self.node, markup::escape_text(text));
        self
    }

    pub fn rect(self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.tree.set_rect(self.node, Rect::new(x, y, width, height));
        self
    }

    pub fn finish(self) -> NodeId {
        self.node
    }
}
