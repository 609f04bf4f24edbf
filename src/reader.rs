//! Document loading and namespace normalization.
//!
//! Every entry point parses its input into a [`Document`] and then runs
//! [`Reader::normalize`], so callers always receive a canonical tree.

use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::xml::{Document, Node, ParseOptions, decode_document};

/// Attribute removed from the root when namespaces are stripped.
const SCHEMA_LOCATION: &str = "schemaLocation";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads MODS documents from text, bytes, files, URLs or existing nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reader {
    namespace_aware: bool,
    parse_options: ParseOptions,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reader {
    pub fn new(namespace_aware: bool) -> Self {
        Self {
            namespace_aware,
            parse_options: ParseOptions::default(),
        }
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    pub fn namespace_aware(&self) -> bool {
        self.namespace_aware
    }

    pub fn parse_options(&self) -> ParseOptions {
        self.parse_options
    }

    /// Parse markup text, recording the encoding from its XML declaration.
    pub fn from_str(&self, text: &str) -> Result<Document> {
        let doc = Document::parse(text, None, self.parse_options)?;
        self.normalize(doc)
    }

    /// Decode and parse raw bytes.
    ///
    /// `encoding` overrides the byte-order mark and the declared encoding.
    pub fn from_bytes(&self, bytes: &[u8], encoding: Option<&str>) -> Result<Document> {
        self.from_bytes_with(bytes, encoding, self.parse_options)
    }

    /// Read and parse a local file.
    pub fn from_file(&self, path: impl AsRef<Path>) -> Result<Document> {
        let bytes = std::fs::read(path.as_ref())?;
        self.from_bytes(&bytes, None)
    }

    /// Fetch a document over HTTP(S) and parse it with `options`.
    ///
    /// Transport failures and non-success statuses are returned as errors;
    /// nothing is retried.
    pub fn from_url(
        &self,
        url: &str,
        encoding: Option<&str>,
        options: ParseOptions,
    ) -> Result<Document> {
        tracing::debug!(url, "fetching record");
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        let response = client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes()?;
        tracing::debug!(url, bytes = body.len(), "fetched record");
        self.from_bytes_with(&body, encoding, options)
    }

    /// Promote `node` to the root of a new document.
    ///
    /// The node is serialized with every namespace declaration in scope and
    /// re-parsed using its owning document's encoding. Siblings and
    /// ancestors are not carried over.
    pub fn from_node(&self, node: Node<'_>) -> Result<Document> {
        let text = node.to_xml();
        let doc = Document::parse(&text, node.document().encoding(), self.parse_options)?;
        self.normalize(doc)
    }

    /// Bring a parsed tree into canonical form.
    ///
    /// A namespace-aware reader returns the tree untouched. Otherwise all
    /// prefixes and declarations are stripped, `schemaLocation` is removed
    /// from the root, and the result is serialized and parsed again so no
    /// state survives from the first parse.
    pub fn normalize(&self, mut doc: Document) -> Result<Document> {
        if self.namespace_aware {
            return Ok(doc);
        }

        doc.strip_namespaces();
        let Some(root) = doc.root().map(|r| r.id()) else {
            return Ok(doc);
        };
        if doc.remove_attribute(root, SCHEMA_LOCATION).is_some() {
            tracing::debug!("removed schemaLocation from root");
        }

        let text = doc.to_xml();
        tracing::debug!(bytes = text.len(), "re-parsing namespace-stripped document");
        Document::parse(&text, doc.encoding(), self.parse_options)
    }

    fn from_bytes_with(
        &self,
        bytes: &[u8],
        encoding: Option<&str>,
        options: ParseOptions,
    ) -> Result<Document> {
        let (text, label) = decode_document(bytes, encoding, options)?;
        let doc = Document::parse(&text, label.as_deref(), options)?;
        let reader = Reader {
            parse_options: options,
            ..*self
        };
        reader.normalize(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminology::MODS_NS_V3;

    const RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mods:mods xmlns:mods="http://www.loc.gov/mods/v3"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://www.loc.gov/mods/v3 http://www.loc.gov/standards/mods/v3/mods-3-4.xsd"
    version="3.4">
  <mods:titleInfo><mods:title>Moby Dick</mods:title></mods:titleInfo>
</mods:mods>"#;

    #[test]
    fn test_aware_keeps_namespaces() {
        let doc = Reader::new(true).from_str(RECORD).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(root.namespace_uri(), Some(MODS_NS_V3));
        assert_eq!(root.attribute("schemaLocation").map(|s| s.is_empty()), Some(false));
        assert_eq!(doc.encoding(), Some("UTF-8"));
    }

    #[test]
    fn test_unaware_strips_namespaces() {
        let doc = Reader::new(false).from_str(RECORD).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(root.name().unwrap().to_string(), "mods");
        assert_eq!(root.namespace_uri(), None);
        assert!(root.namespaces().is_empty());
        assert_eq!(root.attribute("schemaLocation"), None);
        assert_eq!(root.attribute("version"), Some("3.4"));
        assert_eq!(doc.encoding(), Some("UTF-8"));

        let xml = doc.to_xml();
        assert!(!xml.contains("xmlns"));
        assert!(!xml.contains("mods:"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let reader = Reader::new(false);
        let once = reader.from_str(RECORD).unwrap();
        let twice = reader.normalize(once.clone()).unwrap();
        assert_eq!(once.to_xml(), twice.to_xml());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_document_normalizes() {
        let doc = Reader::new(false).from_str("").unwrap();
        assert!(doc.root().is_none());

        let doc = Reader::new(false).from_str("<!-- nothing -->").unwrap();
        assert!(doc.root().is_none());
    }

    #[test]
    fn test_from_bytes_override() {
        let mut bytes = b"<mods><titleInfo><title>Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</title></titleInfo></mods>");
        let doc = Reader::new(false).from_bytes(&bytes, Some("iso-8859-1")).unwrap();
        assert_eq!(doc.root().unwrap().text(), "Café");
        assert_eq!(doc.encoding(), Some("iso-8859-1"));
    }

    #[test]
    fn test_from_node_promotes_subtree() {
        let collection = r#"<modsCollection xmlns="http://www.loc.gov/mods/v3">
  <mods><titleInfo><title>First</title></titleInfo></mods>
  <mods><titleInfo><title>Second</title></titleInfo></mods>
</modsCollection>"#;
        let reader = Reader::default();
        let doc = reader.from_str(collection).unwrap();
        let second = doc.root().unwrap().elements().nth(1).unwrap();

        let promoted = reader.from_node(second).unwrap();
        let root = promoted.root().unwrap();
        assert_eq!(root.local_name(), Some("mods"));
        assert_eq!(root.namespace_uri(), Some(MODS_NS_V3));
        assert_eq!(root.text(), "Second");
        assert!(root.parent().is_some_and(|p| !p.is_element()));
    }

    #[test]
    fn test_strict_options_propagate() {
        let reader = Reader::new(false).with_parse_options(ParseOptions::strict());
        assert!(matches!(reader.from_str("<mods><a></b></mods>"), Err(Error::Malformed(_))));
        assert!(Reader::new(false).from_str("<mods><a></b></mods>").is_ok());
    }
}
