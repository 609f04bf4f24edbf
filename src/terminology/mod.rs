//! Term-mapping layer: named MODS paths resolved to ordered node sets.
//!
//! A [`Term`] names a child element, optionally filtered on an attribute,
//! and lists the sub-terms reachable from it. [`Terminology`] binds the
//! static term table to a namespace convention: namespace-aware trees match
//! elements in the configured MODS namespace, namespace-free trees match
//! unqualified elements. [`ModsDocument`] pairs a canonical tree with the
//! terminology used to read it.

mod table;

use crate::error::{Error, Result};
use crate::xml::{Document, Node};

/// MODS version 3 namespace.
pub const MODS_NS_V3: &str = "http://www.loc.gov/mods/v3";

/// Root element of a MODS record.
pub const MODS_ROOT: &str = "mods";

/// Attribute predicate attached to a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrFilter {
    Any,
    /// `@attr = value`
    Equals(&'static str, &'static str),
}

impl AttrFilter {
    fn matches(&self, node: &Node<'_>) -> bool {
        match *self {
            AttrFilter::Any => true,
            AttrFilter::Equals(attr, value) => node.unqualified_attribute(attr) == Some(value),
        }
    }
}

/// A named path step in the term table.
#[derive(Debug, PartialEq, Eq)]
pub struct Term {
    pub name: &'static str,
    /// Local name of the matched element.
    pub element: &'static str,
    pub filter: AttrFilter,
    pub children: &'static [Term],
}

impl Term {
    /// Look up a sub-term by name.
    pub fn child(&self, name: &str) -> Option<&'static Term> {
        self.children.iter().find(|t| t.name == name)
    }
}

/// Capability interface of the term-mapping layer.
///
/// Callers can ask whether a term is resolvable before selecting it; an
/// unsupported term is an [`Error::UnsupportedOperation`], never a silent
/// empty result.
pub trait TermAccessor {
    /// True if `term` is a top-level term this accessor resolves.
    fn supports(&self, term: &str) -> bool;

    /// Resolve a top-level term to its matching nodes, in document order.
    fn select(&self, term: &str) -> Result<NodeSet<'_>>;
}

/// The MODS term table bound to a namespace convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminology {
    namespace: Option<String>,
    terms: &'static [Term],
}

impl Terminology {
    /// Match elements in namespace `uri`.
    pub fn namespace_aware(uri: impl Into<String>) -> Self {
        Self {
            namespace: Some(uri.into()),
            terms: table::MODS_TERMS,
        }
    }

    /// Match elements without any namespace.
    pub fn namespace_free() -> Self {
        Self {
            namespace: None,
            terms: table::MODS_TERMS,
        }
    }

    /// The namespace elements must be in, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Names of all top-level terms.
    pub fn terms(&self) -> impl Iterator<Item = &'static str> {
        self.terms.iter().map(|t| t.name)
    }

    /// Look up a top-level term.
    pub fn term(&self, name: &str) -> Option<&'static Term> {
        self.terms.iter().find(|t| t.name == name)
    }

    /// True if `node` is an element named `local` under this convention.
    pub fn is_element(&self, node: &Node<'_>, local: &str) -> bool {
        if node.local_name() != Some(local) {
            return false;
        }
        match &self.namespace {
            Some(ns) => node.namespace_uri() == Some(ns.as_str()),
            None => node.namespace_uri().is_none(),
        }
    }

    fn matches(&self, node: &Node<'_>, term: &Term) -> bool {
        self.is_element(node, term.element) && term.filter.matches(node)
    }

    /// The `mods` root of `doc`, if it has one under this convention.
    pub fn mods_root<'a>(&self, doc: &'a Document) -> Option<Node<'a>> {
        doc.root().filter(|root| self.is_element(root, MODS_ROOT))
    }

    /// Resolve a top-level term against `doc`.
    pub fn select<'a>(&'a self, doc: &'a Document, name: &str) -> Result<NodeSet<'a>> {
        let term = self
            .term(name)
            .ok_or_else(|| Error::UnsupportedOperation(name.to_string()))?;
        let nodes = match self.mods_root(doc) {
            Some(root) => root.elements().filter(|n| self.matches(n, term)).collect(),
            None => Vec::new(),
        };
        Ok(NodeSet {
            nodes,
            term,
            terminology: self,
        })
    }
}

/// Ordered nodes matched by one term.
///
/// The set can be iterated any number of times; each item carries the term
/// so sub-terms stay reachable.
#[derive(Debug, Clone)]
pub struct NodeSet<'a> {
    nodes: Vec<Node<'a>>,
    term: &'static Term,
    terminology: &'a Terminology,
}

impl<'a> NodeSet<'a> {
    pub fn term(&self) -> &'static Term {
        self.term
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = TermNode<'a>> + '_ {
        self.nodes.iter().map(|&node| TermNode {
            node,
            term: self.term,
            terminology: self.terminology,
        })
    }

    pub fn first(&self) -> Option<TermNode<'a>> {
        self.iter().next()
    }

    /// Text of every node concatenated, with no separator.
    pub fn text(&self) -> String {
        self.nodes.iter().map(|n| n.text()).collect()
    }

    /// Text of each node.
    pub fn texts(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.text()).collect()
    }

    /// Values of attribute `name` on the nodes that carry it.
    pub fn attr_values(&self, name: &str) -> Vec<&'a str> {
        self.nodes.iter().filter_map(|n| n.unqualified_attribute(name)).collect()
    }

    /// Sub-term `name` of every node, flattened in document order.
    pub fn get(&self, name: &str) -> Result<NodeSet<'a>> {
        let child = self.term.child(name).ok_or_else(|| {
            Error::UnsupportedOperation(format!("{}.{}", self.term.name, name))
        })?;
        let nodes = self
            .nodes
            .iter()
            .flat_map(|n| n.elements())
            .filter(|n| self.terminology.matches(n, child))
            .collect();
        Ok(NodeSet {
            nodes,
            term: child,
            terminology: self.terminology,
        })
    }
}

/// A single node matched by a term.
#[derive(Debug, Clone, Copy)]
pub struct TermNode<'a> {
    node: Node<'a>,
    term: &'static Term,
    terminology: &'a Terminology,
}

impl<'a> TermNode<'a> {
    pub fn node(&self) -> Node<'a> {
        self.node
    }

    pub fn term(&self) -> &'static Term {
        self.term
    }

    /// Raw text content, untrimmed.
    pub fn text(&self) -> String {
        self.node.text()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.unqualified_attribute(name)
    }

    /// Sub-term `name` of this node.
    pub fn get(&self, name: &str) -> Result<NodeSet<'a>> {
        NodeSet {
            nodes: vec![self.node],
            term: self.term,
            terminology: self.terminology,
        }
        .get(name)
    }
}

/// A canonical tree together with the terminology that reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModsDocument {
    document: Document,
    terminology: Terminology,
}

impl ModsDocument {
    pub fn new(document: Document, terminology: Terminology) -> Self {
        Self {
            document,
            terminology,
        }
    }

    /// An empty tree read namespace-free.
    pub fn empty() -> Self {
        Self::new(Document::new(), Terminology::namespace_free())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn terminology(&self) -> &Terminology {
        &self.terminology
    }

    /// The `mods` root element, if present.
    pub fn root(&self) -> Option<Node<'_>> {
        self.terminology.mods_root(&self.document)
    }
}

impl TermAccessor for ModsDocument {
    fn supports(&self, term: &str) -> bool {
        self.terminology.term(term).is_some()
    }

    fn select(&self, term: &str) -> Result<NodeSet<'_>> {
        self.terminology.select(&self.document, term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::ParseOptions;

    const RECORD: &str = r#"<mods xmlns="http://www.loc.gov/mods/v3">
  <titleInfo><nonSort>The</nonSort><title>Title</title></titleInfo>
  <titleInfo type="alternative"><title>Other</title></titleInfo>
  <name type="personal"><namePart type="family">Doe</namePart><namePart type="given">Jane</namePart></name>
  <name type="corporate"><namePart>ACME</namePart></name>
  <language><languageTerm type="code" authority="iso639-2b">eng</languageTerm></language>
</mods>"#;

    fn aware() -> ModsDocument {
        let doc = Document::parse(RECORD, None, ParseOptions::default()).unwrap();
        ModsDocument::new(doc, Terminology::namespace_aware(MODS_NS_V3))
    }

    #[test]
    fn test_supports() {
        let mods = aware();
        assert!(mods.supports("title_info"));
        assert!(mods.supports("personal_name"));
        assert!(!mods.supports("titleInfo"));
        assert!(!mods.supports("bogus"));
    }

    #[test]
    fn test_select_in_document_order() {
        let mods = aware();
        let titles = mods.select("title_info").unwrap();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles.get("title").unwrap().texts(), vec!["Title", "Other"]);
        assert_eq!(titles.attr_values("type"), vec!["alternative"]);
    }

    #[test]
    fn test_filtered_terms() {
        let mods = aware();
        assert_eq!(mods.select("name").unwrap().len(), 2);
        let personal = mods.select("personal_name").unwrap();
        assert_eq!(personal.len(), 1);
        let person = personal.first().unwrap();
        assert_eq!(person.get("family_name").unwrap().text(), "Doe");
        assert_eq!(person.get("given_name").unwrap().text(), "Jane");
        assert_eq!(person.get("namePart").unwrap().text(), "DoeJane");
        assert!(person.get("displayForm").unwrap().is_empty());
        assert_eq!(mods.select("corporate_name").unwrap().text(), "ACME");
    }

    #[test]
    fn test_nested_attribute_lookup() {
        let mods = aware();
        let codes = mods.select("language").unwrap().get("code_term").unwrap();
        let code = codes.first().unwrap();
        assert_eq!(code.attr("authority"), Some("iso639-2b"));
        assert_eq!(code.text(), "eng");
    }

    #[test]
    fn test_unknown_sub_term() {
        let mods = aware();
        let err = mods.select("title_info").unwrap().get("bogus").unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(ref name) if name == "title_info.bogus"));
        assert!(matches!(mods.select("bogus"), Err(Error::UnsupportedOperation(_))));
    }

    #[test]
    fn test_namespace_convention() {
        let doc = Document::parse(RECORD, None, ParseOptions::default()).unwrap();
        let free = ModsDocument::new(doc.clone(), Terminology::namespace_free());
        assert!(free.root().is_none());
        assert!(free.select("title_info").unwrap().is_empty());

        let mut stripped = doc;
        stripped.strip_namespaces();
        let free = ModsDocument::new(stripped, Terminology::namespace_free());
        assert_eq!(free.select("title_info").unwrap().len(), 2);

        let other = Document::parse(RECORD, None, ParseOptions::default()).unwrap();
        let wrong_ns = ModsDocument::new(other, Terminology::namespace_aware("urn:elsewhere"));
        assert!(wrong_ns.select("title_info").unwrap().is_empty());
    }

    #[test]
    fn test_terms_listing() {
        let terms: Vec<_> = Terminology::namespace_free().terms().collect();
        assert!(terms.contains(&"title_info"));
        assert!(terms.contains(&"language"));
        assert!(terms.contains(&"record_info"));
    }

    #[test]
    fn test_empty_document() {
        let mods = ModsDocument::empty();
        assert!(mods.root().is_none());
        assert!(mods.select("title_info").unwrap().is_empty());
    }
}
