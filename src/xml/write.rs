//! Serialize documents and nodes back to XML text.

use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};

use super::{Document, NamespaceDecl, Node, NodeData};

impl Document {
    /// Serialize the whole document, with an XML declaration.
    ///
    /// Top-level nodes are separated by newlines; no other whitespace is
    /// added, so parsing the output and serializing again is stable.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"");
        out.push_str(self.version().unwrap_or("1.0"));
        out.push('"');
        if let Some(encoding) = self.encoding() {
            let _ = write!(out, " encoding=\"{}\"", escape(encoding));
        }
        out.push_str("?>\n");

        for child in self.document_node().children() {
            write_node(child, &[], &mut out);
            out.push('\n');
        }
        out
    }
}

impl Node<'_> {
    /// Serialize this node on its own.
    ///
    /// For an element, namespace declarations inherited from ancestors are
    /// repeated on the element so the output parses as a standalone document.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        match self.data() {
            NodeData::Document => {
                for child in self.children() {
                    write_node(child, &[], &mut out);
                }
            }
            NodeData::Element { .. } => {
                let inherited: Vec<&NamespaceDecl> = self
                    .in_scope_namespaces()
                    .into_iter()
                    .filter(|decl| !self.namespaces().iter().any(|own| own.prefix == decl.prefix))
                    .collect();
                write_node(*self, &inherited, &mut out);
            }
            _ => write_node(*self, &[], &mut out),
        }
        out
    }
}

fn write_node(node: Node<'_>, extra_namespaces: &[&NamespaceDecl], out: &mut String) {
    match node.data() {
        NodeData::Document => {}
        NodeData::Element {
            name,
            attrs,
            namespaces,
        } => {
            let _ = write!(out, "<{}", name);
            for decl in namespaces.iter().chain(extra_namespaces.iter().copied()) {
                match &decl.prefix {
                    Some(prefix) => {
                        let _ = write!(out, " xmlns:{}=\"{}\"", prefix, escape(&decl.uri));
                    }
                    None => {
                        let _ = write!(out, " xmlns=\"{}\"", escape(&decl.uri));
                    }
                }
            }
            for attr in attrs {
                let _ = write!(out, " {}=\"{}\"", attr.name, escape(&attr.value));
            }

            let mut children = node.children().peekable();
            if children.peek().is_none() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in children {
                write_node(child, &[], out);
            }
            let _ = write!(out, "</{}>", name);
        }
        NodeData::Text(text) => out.push_str(&partial_escape(text)),
        NodeData::Comment(text) => {
            let _ = write!(out, "<!--{}-->", text);
        }
        NodeData::ProcessingInstruction(content) => {
            let _ = write!(out, "<?{}?>", content);
        }
        NodeData::Doctype(content) => {
            let _ = write!(out, "<!DOCTYPE {}>", content);
        }
    }
}
