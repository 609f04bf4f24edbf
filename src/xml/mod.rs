//! Arena-based XML tree.
//!
//! Documents are parsed from `quick-xml` events into a contiguous node arena.
//! Nodes refer to each other by [`NodeId`] and are read through the borrowed
//! [`Node`] handle. Element names keep their prefix so a tree can be queried
//! either namespace-qualified or, after [`Document::strip_namespaces`], by
//! bare local names.

mod encoding;
mod parse;
mod write;

use std::fmt;

pub use encoding::decode_document;
pub use parse::ParseOptions;

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// Element or attribute name, split at the first colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    /// Split a raw `prefix:local` name.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            _ => Self::local(raw),
        }
    }

    /// A name without prefix.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// An attribute on an element. Namespace declarations are kept apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// An `xmlns` or `xmlns:prefix` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub uri: String,
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Document root (always [`Document::document_id`]).
    Document,
    Element {
        name: QName,
        attrs: Vec<Attribute>,
        namespaces: Vec<NamespaceDecl>,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction(String),
    Doctype(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed XML document.
///
/// All nodes live in one vector; parent and child links are indices into it.
/// The document node is always at index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    version: Option<String>,
    encoding: Option<String>,
}

impl Document {
    /// Create a document with no content.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeEntry {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
            version: None,
            encoding: None,
        }
    }

    /// Get the document node ID.
    pub fn document_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Declared XML version, if the source had a declaration.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Encoding label recorded for this document.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn set_encoding(&mut self, encoding: Option<String>) {
        self.encoding = encoding;
    }

    /// Handle for any node in this document.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different document.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!((id.0 as usize) < self.nodes.len(), "node id out of range");
        Node { doc: self, id }
    }

    /// The document node.
    pub fn document_node(&self) -> Node<'_> {
        self.node(self.document_id())
    }

    /// The single top-level element, if any.
    pub fn root(&self) -> Option<Node<'_>> {
        self.document_node().elements().next()
    }

    /// Number of nodes, including the document node.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document holds nothing but the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Allocate a node and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeEntry {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Append text to `parent`, merging into a trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0 as usize].children.last()
            && let NodeData::Text(existing) = &mut self.nodes[last.0 as usize].data
        {
            existing.push_str(text);
            return;
        }
        self.append(parent, NodeData::Text(text.to_string()));
    }

    /// Remove namespace qualification from every element and attribute name
    /// and drop all namespace declarations.
    ///
    /// When attributes collapse onto the same local name, an unprefixed one
    /// wins over prefixed ones (`type` beats `xlink:type`); otherwise the
    /// first in document order is kept.
    pub fn strip_namespaces(&mut self) {
        for entry in &mut self.nodes {
            if let NodeData::Element {
                name,
                attrs,
                namespaces,
            } = &mut entry.data
            {
                name.prefix = None;
                namespaces.clear();

                let keep: Vec<bool> = attrs
                    .iter()
                    .enumerate()
                    .map(|(i, attr)| {
                        let winner = attrs
                            .iter()
                            .position(|a| a.name.local == attr.name.local && a.name.prefix.is_none())
                            .or_else(|| attrs.iter().position(|a| a.name.local == attr.name.local));
                        winner == Some(i)
                    })
                    .collect();

                let mut index = 0;
                attrs.retain_mut(|attr| {
                    let kept = keep[index];
                    index += 1;
                    if !kept {
                        tracing::debug!(element = %name.local, attribute = %attr.name, "dropping duplicate attribute after namespace strip");
                    }
                    attr.name.prefix = None;
                    kept
                });
            }
        }
    }

    /// Remove the first attribute of element `id` whose local name is `local`.
    pub fn remove_attribute(&mut self, id: NodeId, local: &str) -> Option<Attribute> {
        match &mut self.nodes.get_mut(id.0 as usize)?.data {
            NodeData::Element { attrs, .. } => {
                let pos = attrs.iter().position(|a| a.name.local == local)?;
                Some(attrs.remove(pos))
            }
            _ => None,
        }
    }

    /// Drop whitespace-only text nodes everywhere in the tree.
    fn drop_blank_text(&mut self) {
        let blank: Vec<bool> = self
            .nodes
            .iter()
            .map(|n| matches!(&n.data, NodeData::Text(t) if t.trim().is_empty()))
            .collect();
        for entry in &mut self.nodes {
            entry.children.retain(|c| !blank[c.0 as usize]);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed handle to a node in a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("data", self.data())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl<'a> Node<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The document this node belongs to.
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    fn entry(&self) -> &'a NodeEntry {
        &self.doc.nodes[self.id.0 as usize]
    }

    pub fn data(&self) -> &'a NodeData {
        &self.entry().data
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data(), NodeData::Element { .. })
    }

    /// Qualified element name.
    pub fn name(&self) -> Option<&'a QName> {
        match self.data() {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Element local name (tag without prefix).
    pub fn local_name(&self) -> Option<&'a str> {
        self.name().map(|n| n.local.as_str())
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        match self.data() {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Namespace declarations made on this element.
    pub fn namespaces(&self) -> &'a [NamespaceDecl] {
        match self.data() {
            NodeData::Element { namespaces, .. } => namespaces,
            _ => &[],
        }
    }

    /// Attribute value looked up by local name, ignoring any prefix.
    pub fn attribute(&self, local: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|a| a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Value of the attribute named exactly `local`, with no prefix.
    ///
    /// Unprefixed attributes are in no namespace, so `xlink:type` is never
    /// returned for `type`.
    pub fn unqualified_attribute(&self, local: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|a| a.name.prefix.is_none() && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.entry().parent.map(|id| Node { doc: self.doc, id })
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        let doc = self.doc;
        self.entry().children.iter().map(move |&id| Node { doc, id })
    }

    /// Child elements, skipping text, comments and the like.
    pub fn elements(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        self.children().filter(|n| n.is_element())
    }

    /// Resolve a prefix (or the default namespace for `None`) in scope here.
    pub fn lookup_namespace(&self, prefix: Option<&str>) -> Option<&'a str> {
        if prefix == Some("xml") {
            return Some(XML_NAMESPACE);
        }
        let mut current = Some(*self);
        while let Some(node) = current {
            if let Some(decl) = node
                .namespaces()
                .iter()
                .find(|d| d.prefix.as_deref() == prefix)
            {
                // xmlns="" undeclares the default namespace
                return (!decl.uri.is_empty()).then_some(decl.uri.as_str());
            }
            current = node.parent();
        }
        None
    }

    /// Namespace URI of this element.
    pub fn namespace_uri(&self) -> Option<&'a str> {
        let name = self.name()?;
        self.lookup_namespace(name.prefix.as_deref())
    }

    /// Every namespace declaration visible at this element, nearest first.
    pub fn in_scope_namespaces(&self) -> Vec<&'a NamespaceDecl> {
        let mut found: Vec<&'a NamespaceDecl> = Vec::new();
        let mut current = Some(*self);
        while let Some(node) = current {
            for decl in node.namespaces() {
                if !found.iter().any(|d| d.prefix == decl.prefix) {
                    found.push(decl);
                }
            }
            current = node.parent();
        }
        found
    }

    /// Concatenated text of all descendant text nodes, untrimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.data() {
            NodeData::Text(t) => out.push_str(t),
            NodeData::Element { .. } | NodeData::Document => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
            _ => {}
        }
    }

    /// Depth-first iterator over this node and everything below it.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            doc: self.doc,
            stack: vec![self.id],
        }
    }
}

/// Pre-order traversal, see [`Node::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack
            .extend(self.doc.nodes[id.0 as usize].children.iter().rev().copied());
        Some(Node { doc: self.doc, id })
    }
}
