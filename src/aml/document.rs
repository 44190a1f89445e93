//! Document model
//!
//!     The parser builds a tree of objects, arrays and scalar strings. Nodes live in an
//!     arena owned by the [`Document`] and are addressed by [`NodeId`] handles, so the
//!     context stack can hold on to "where writes go" without borrowing into the tree.
//!
//!     Nodes are never removed from the arena. Overwriting a key or redefining an array
//!     leaves the old node behind, unreachable from the root and ignored by every reader.
//!     Memory therefore grows with the number of lines parsed, not with the size of the
//!     resulting tree: every intermediate value is held until the document is dropped.
//!     [`Document::node_count`] reports the arena size.
//!
//!     Object properties keep insertion order and are indexed by key, so building a wide
//!     object stays linear.
//!
//!     Reading is done through [`NodeRef`], a cheap `(document, id)` pair:
//!
//!     ```rust,ignore
//!     let doc = archieml::parse("[people]\nname: Alice\n");
//!     let name = doc.get_path("people.0.name").and_then(|n| n.as_str());
//!     assert_eq!(name, Some("Alice"));
//!     ```

use crate::aml::error::ParseFault;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Stable handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(String),
    Object(Properties),
    Array(Vec<NodeId>),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Object(_) => NodeKind::Object,
            Node::Array(_) => NodeKind::Array,
        }
    }
}

/// Object properties in insertion order. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: Vec<(String, NodeId)>,
    index: HashMap<String, usize>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[(String, NodeId)] {
        &self.entries
    }

    /// Bind `key` to `value`. A previous binding is replaced in place and returned.
    pub(crate) fn insert(&mut self, key: &str, value: NodeId) -> Option<NodeId> {
        match self.index.get(key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
                None
            }
        }
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Properties {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Object,
    Array,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Object => "object",
            NodeKind::Array => "array",
        };
        f.write_str(name)
    }
}

/// The parse result: a root object plus every node reachable from it.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    const ROOT: NodeId = NodeId(0);

    /// An empty document: a root object with no properties.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Object(Properties::new())],
        }
    }

    pub fn root_id(&self) -> NodeId {
        Self::ROOT
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.get(Self::ROOT)
    }

    /// View of an arbitrary node.
    ///
    /// Panics if `id` was not produced by this document.
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Every node allocated so far, including ones no longer reachable from the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root object has no properties.
    pub fn is_empty(&self) -> bool {
        self.root().is_empty()
    }

    /// Follow a dot-separated path from the root.
    ///
    /// Segments address object keys; on arrays a numeric segment addresses an index.
    pub fn get_path(&self, path: &str) -> Option<NodeRef<'_>> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.root(), |node, segment| match node.kind() {
                NodeKind::Object => node.get(segment),
                NodeKind::Array => segment.parse().ok().and_then(|i| node.at(i)),
                NodeKind::Scalar => None,
            })
    }

    /// Convert the reachable tree into a `serde_json::Value`, preserving key order.
    pub fn to_value(&self) -> Value {
        self.root().to_value()
    }

    // ------------------------------------------------------------------------
    // Construction, used by the tree builder
    // ------------------------------------------------------------------------

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn new_scalar(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::Scalar(text.into()))
    }

    pub(crate) fn new_object(&mut self) -> NodeId {
        self.alloc(Node::Object(Properties::new()))
    }

    pub(crate) fn new_array(&mut self) -> NodeId {
        self.alloc(Node::Array(Vec::new()))
    }

    /// A freeform array entry: `{type: kind, value: <value>}`.
    pub(crate) fn new_entry(&mut self, kind: &str, value: NodeId) -> NodeId {
        let kind = self.new_scalar(kind);
        let mut props = Properties::new();
        props.insert("type", kind);
        props.insert("value", value);
        self.alloc(Node::Object(props))
    }

    /// Replace the text of a scalar node.
    ///
    /// Non-scalar ids are left untouched; the multiline buffer only ever points at scalars.
    pub(crate) fn set_text(&mut self, id: NodeId, text: String) {
        if let Node::Scalar(existing) = &mut self.nodes[id.0] {
            *existing = text;
        }
    }

    pub(crate) fn property(&self, object: NodeId, key: &str) -> Result<Option<NodeId>, ParseFault> {
        match &self.nodes[object.0] {
            Node::Object(props) => Ok(props.get(key)),
            _ => Err(ParseFault::NotAnObject(object)),
        }
    }

    /// Bind `key` to `value`, replacing any previous binding in place.
    pub(crate) fn set_property(
        &mut self,
        object: NodeId,
        key: &str,
        value: NodeId,
    ) -> Result<(), ParseFault> {
        match &mut self.nodes[object.0] {
            Node::Object(props) => {
                props.insert(key, value);
                Ok(())
            }
            _ => Err(ParseFault::NotAnObject(object)),
        }
    }

    pub(crate) fn push(&mut self, array: NodeId, value: NodeId) -> Result<(), ParseFault> {
        match &mut self.nodes[array.0] {
            Node::Array(items) => {
                items.push(value);
                Ok(())
            }
            _ => Err(ParseFault::NotAnArray(array)),
        }
    }

    /// The object bound to `key`, creating it (and overwriting any non-object) if needed.
    fn child_object(&mut self, parent: NodeId, key: &str) -> Result<NodeId, ParseFault> {
        if let Some(existing) = self.property(parent, key)? {
            if self.nodes[existing.0].kind() == NodeKind::Object {
                return Ok(existing);
            }
        }
        let child = self.new_object();
        self.set_property(parent, key, child)?;
        Ok(child)
    }

    /// Walk every segment of `path` but the last, creating objects as needed.
    ///
    /// Returns the object that should hold the final segment, and that segment.
    /// Empty segments (`a..b`) are skipped along the way.
    pub(crate) fn resolve_parent<'k>(
        &mut self,
        from: NodeId,
        path: &'k str,
    ) -> Result<(NodeId, &'k str), ParseFault> {
        match path.rsplit_once('.') {
            Some((head, last)) => Ok((self.resolve_object(from, head)?, last)),
            None => Ok((from, path)),
        }
    }

    /// Walk the whole of `path`, creating objects as needed, and return the final object.
    pub(crate) fn resolve_object(&mut self, from: NodeId, path: &str) -> Result<NodeId, ParseFault> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(from, |target, segment| self.child_object(target, segment))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    /// Documents are equal when their reachable trees are equal, key order included.
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

/// Read-only view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a Node {
        self.doc.node(self.id)
    }

    pub fn kind(&self) -> NodeKind {
        self.node().kind()
    }

    pub fn is_scalar(&self) -> bool {
        self.kind() == NodeKind::Scalar
    }

    pub fn is_object(&self) -> bool {
        self.kind() == NodeKind::Object
    }

    pub fn is_array(&self) -> bool {
        self.kind() == NodeKind::Array
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self.node() {
            Node::Scalar(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Property lookup on an object; `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<NodeRef<'a>> {
        match self.node() {
            Node::Object(props) => props.get(key).map(|id| self.doc.get(id)),
            _ => None,
        }
    }

    /// Element lookup on an array; `None` when out of range or not an array.
    pub fn at(&self, index: usize) -> Option<NodeRef<'a>> {
        self.elements().get(index).map(|id| self.doc.get(*id))
    }

    /// Number of properties, elements, or characters for a scalar.
    pub fn len(&self) -> usize {
        match self.node() {
            Node::Scalar(text) => text.chars().count(),
            Node::Object(props) => props.len(),
            Node::Array(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.properties().iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'a str, NodeRef<'a>)> + 'a {
        let doc = self.doc;
        self.properties()
            .iter()
            .map(move |(k, id)| (k.as_str(), doc.get(*id)))
    }

    pub fn items(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        self.elements().iter().map(move |id| doc.get(*id))
    }

    pub fn to_value(&self) -> Value {
        match self.node() {
            Node::Scalar(text) => Value::String(text.clone()),
            Node::Object(_) => Value::Object(
                self.entries()
                    .map(|(k, child)| (k.to_string(), child.to_value()))
                    .collect(),
            ),
            Node::Array(_) => Value::Array(self.items().map(|item| item.to_value()).collect()),
        }
    }

    fn properties(&self) -> &'a [(String, NodeId)] {
        match self.node() {
            Node::Object(props) => props.as_slice(),
            _ => &[],
        }
    }

    fn elements(&self) -> &'a [NodeId] {
        match self.node() {
            Node::Array(items) => items,
            _ => &[],
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.node(), other.node()) {
            (Node::Scalar(a), Node::Scalar(b)) => a == b,
            (Node::Object(a), Node::Object(b)) => {
                a.len() == b.len()
                    && self
                        .entries()
                        .zip(other.entries())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            (Node::Array(a), Node::Array(b)) => {
                a.len() == b.len() && self.items().zip(other.items()).all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Scalar(text) => write!(f, "{:?}", text),
            Node::Object(_) => f.debug_map().entries(self.entries()).finish(),
            Node::Array(_) => f.debug_list().entries(self.items()).finish(),
        }
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.node() {
            Node::Scalar(text) => serializer.serialize_str(text),
            Node::Object(props) => {
                let mut map = serializer.serialize_map(Some(props.len()))?;
                for (key, child) in self.entries() {
                    map.serialize_entry(key, &child)?;
                }
                map.end()
            }
            Node::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in self.items() {
                    seq.serialize_element(&item)?;
                }
                seq.end()
            }
        }
    }
}
