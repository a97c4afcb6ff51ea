//! The live document tree
//!
//! An arena-backed element tree standing in for the browser DOM of the
//! portal page. The builder only ever appends: nodes are never removed or
//! reordered once placed, and the tree lives for the lifetime of the
//! document.
//!
//! A fresh [`Document`] is seeded with the skeleton the device serves as
//! static HTML: `html > head + body > div#wrapper`, where `#wrapper` is
//! the default root container every unresolvable parent selector falls
//! back to.

use crate::config;
use crate::selector::Selector;
use std::fmt::Write as _;

/// Handle to a node in the document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Payload of a single node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// An element node
    Element(ElementData),
    /// A text node
    Text(String),
}

/// Element-specific data
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Tag name (the descriptor's kind, verbatim)
    pub tag: String,
    /// Cached id attribute, extracted when the `id` attribute is set
    pub id: Option<String>,
    /// Applied attributes in application order
    pub attrs: Vec<(String, String)>,
}

/// A single node with its tree links
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Tags serialized without a closing tag
const VOID_TAGS: &[&str] = &["input", "img", "br", "hr", "meta", "link"];

/// The complete live tree of a portal page.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    title: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with the static page skeleton:
    /// `html > head + body > div#wrapper`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            title: String::new(),
        };
        let html = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        let wrapper = doc.create_element("div");
        doc.set_attribute(wrapper, "id", "wrapper");
        doc.append_child(html, head);
        doc.append_child(html, body);
        doc.append_child(body, wrapper);
        doc.root = html;
        doc
    }

    /// The root `html` node
    pub fn root(&self) -> NodeId {
        self.root
    }

    // =======================================================================
    // Node creation
    // =======================================================================

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.allocate(NodeData::Element(ElementData {
            tag: tag.to_string(),
            id: None,
            attrs: Vec::new(),
        }))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.allocate(NodeData::Text(text.to_string()))
    }

    fn allocate(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // =======================================================================
    // Tree mutation
    // =======================================================================

    /// Append `child` as the last child of `parent`.
    ///
    /// The builder is append-only; a node that already has a parent is
    /// left where it is.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(child).and_then(|n| n.parent).is_some() {
            tracing::warn!(?child, "Refusing to re-parent an attached node");
            return;
        }
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
        }
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(child);
        }
    }

    /// Set an attribute on an element node.
    ///
    /// Setting `id` also updates the element's id cache used by
    /// [`Document::get_element_by_id`]. Non-element nodes are ignored.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(NodeData::Element(elem)) = self.node_mut(node).map(|n| &mut n.data) {
            if name == "id" {
                elem.id = Some(value.to_string());
            }
            if let Some(entry) = elem.attrs.iter_mut().find(|(n, _)| n == name) {
                entry.1 = value.to_string();
            } else {
                elem.attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Set the page title (the `meta.title` of the plan)
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// The page title
    pub fn title(&self) -> &str {
        &self.title
    }

    // =======================================================================
    // Accessors
    // =======================================================================

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element(elem)) => Some(elem),
            _ => None,
        }
    }

    /// Text content of a node, if it is a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Look up an applied attribute on an element node
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Immediate children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// All descendants of `node` in pre-order DFS (not including `node`).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    // =======================================================================
    // Queries
    // =======================================================================

    /// First element with the given id attribute, in pre-order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.match_first(|elem| elem.id.as_deref() == Some(id))
    }

    /// First element with the given tag name, in pre-order.
    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.match_first(|elem| elem.tag == tag)
    }

    fn match_first(&self, pred: impl Fn(&ElementData) -> bool) -> Option<NodeId> {
        if self.element(self.root).is_some_and(&pred) {
            return Some(self.root);
        }
        self.descendants(self.root)
            .into_iter()
            .find(|&id| self.element(id).is_some_and(&pred))
    }

    /// Resolve a parsed selector against the tree
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        match selector {
            Selector::Id(id) => self.get_element_by_id(id),
            Selector::Tag(tag) => self.first_by_tag(tag),
        }
    }

    /// Resolve a raw selector string, substituting the default root
    /// container when parsing fails or the lookup yields nothing.
    ///
    /// This is the silent-fallback rule: an unresolvable parent is never
    /// an error, the node is attached under `#wrapper` instead.
    pub fn resolve_or_root(&self, selector: &str) -> NodeId {
        if let Ok(parsed) = Selector::parse(selector) {
            if let Some(found) = self.query(&parsed) {
                return found;
            }
        }
        tracing::debug!(selector, "Parent selector unresolvable, falling back to root container");
        Selector::parse(config::DEFAULT_ROOT_SELECTOR)
            .ok()
            .and_then(|sel| self.query(&sel))
            .unwrap_or(self.root)
    }

    // =======================================================================
    // Serialization
    // =======================================================================

    /// Serialize the tree to indented HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(&mut out, self.root, 0);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => {
                let _ = writeln!(out, "{indent}{}", escape_text(text));
            }
            Some(NodeData::Element(elem)) => {
                let _ = write!(out, "{indent}<{}", elem.tag);
                for (name, value) in &elem.attrs {
                    let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
                }
                let _ = writeln!(out, ">");
                for &child in self.children(id) {
                    self.write_node(out, child, depth + 1);
                }
                if !VOID_TAGS.contains(&elem.tag.as_str()) {
                    let _ = writeln!(out, "{indent}</{}>", elem.tag);
                }
            }
            None => {}
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
