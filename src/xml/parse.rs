//! Build a [`Document`] from `quick-xml` events.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Attribute, Document, NamespaceDecl, NodeData, NodeId, QName};
use crate::error::{Error, Result};

/// Parser behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Repair structural problems instead of failing: mismatched or
    /// unmatched end tags, unclosed elements, stray text or extra elements
    /// outside the root, bad attributes and unknown entities.
    pub recover: bool,
    /// Drop whitespace-only text nodes.
    pub no_blanks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recover: true,
            no_blanks: false,
        }
    }
}

impl ParseOptions {
    /// Options that reject anything the permissive defaults would repair.
    pub fn strict() -> Self {
        Self {
            recover: false,
            ..Self::default()
        }
    }

    pub fn with_recover(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    pub fn with_no_blanks(mut self, no_blanks: bool) -> Self {
        self.no_blanks = no_blanks;
        self
    }
}

impl Document {
    /// Parse XML text into a document.
    ///
    /// `encoding` is the label to record on the document. When `None`, the
    /// label from the XML declaration (if any) is used. The text itself is
    /// never transcoded.
    pub fn parse(text: &str, encoding: Option<&str>, options: ParseOptions) -> Result<Document> {
        let mut reader = Reader::from_str(text);
        {
            let config = reader.config_mut();
            // End tags are matched against our own stack so recover mode can repair them
            config.check_end_names = false;
            config.allow_unmatched_ends = true;
            config.allow_dangling_amp = options.recover;
        }

        let mut doc = Document::new();
        doc.encoding = encoding.map(str::to_string);

        let mut builder = Builder {
            doc,
            stack: Vec::new(),
            skip_depth: 0,
            options,
        };

        loop {
            match reader.read_event()? {
                Event::Decl(decl) => {
                    let version = decl.version().map_err(quick_xml::Error::from)?;
                    builder.doc.version = Some(String::from_utf8_lossy(&version).into_owned());
                    if builder.doc.encoding.is_none()
                        && let Some(label) = decl.encoding()
                    {
                        let label = label.map_err(quick_xml::Error::from)?;
                        builder.doc.encoding = Some(String::from_utf8_lossy(&label).into_owned());
                    }
                }
                Event::Start(e) => builder.open(&e, false)?,
                Event::Empty(e) => builder.open(&e, true)?,
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    builder.close(&name)?;
                }
                Event::Text(e) => builder.text(&String::from_utf8_lossy(e.as_ref()))?,
                Event::CData(e) => builder.text(&String::from_utf8_lossy(e.as_ref()))?,
                Event::GeneralRef(e) => {
                    let entity = String::from_utf8_lossy(e.as_ref()).into_owned();
                    match resolve_entity(&entity) {
                        Some(resolved) => builder.text(&resolved)?,
                        None if options.recover => builder.text(&format!("&{};", entity))?,
                        None => return Err(Error::Malformed(format!("unknown entity &{};", entity))),
                    }
                }
                Event::Comment(e) => {
                    let comment = String::from_utf8_lossy(e.as_ref()).into_owned();
                    builder.leaf(NodeData::Comment(comment));
                }
                Event::PI(e) => {
                    let content = String::from_utf8_lossy(e.as_ref()).into_owned();
                    builder.leaf(NodeData::ProcessingInstruction(content));
                }
                Event::DocType(e) => {
                    let content = String::from_utf8_lossy(e.as_ref()).trim().to_string();
                    builder.leaf(NodeData::Doctype(content));
                }
                Event::Eof => break,
            }
        }

        builder.finish()
    }
}

struct Builder {
    doc: Document,
    /// Open elements, outermost first.
    stack: Vec<(NodeId, String)>,
    /// Depth inside an element being discarded (extra roots in recover mode).
    skip_depth: usize,
    options: ParseOptions,
}

impl Builder {
    fn parent(&self) -> NodeId {
        self.stack
            .last()
            .map(|(id, _)| *id)
            .unwrap_or_else(|| self.doc.document_id())
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        let raw_name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        if self.skip_depth > 0 || (self.stack.is_empty() && self.doc.root().is_some()) {
            if !self.options.recover {
                return Err(Error::Malformed(format!(
                    "element <{}> after the root element",
                    raw_name
                )));
            }
            if self.skip_depth == 0 {
                tracing::debug!(element = %raw_name, "dropping element after the root element");
            }
            if !empty {
                self.skip_depth += 1;
            }
            return Ok(());
        }

        let mut attrs = Vec::new();
        let mut namespaces = Vec::new();

        for attr in e.attributes() {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) if self.options.recover => {
                    tracing::debug!(element = %raw_name, error = %err, "skipping malformed attribute");
                    continue;
                }
                Err(err) => return Err(Error::Xml(err.into())),
            };

            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) if self.options.recover => String::from_utf8_lossy(&attr.value).into_owned(),
                Err(err) => return Err(Error::Xml(err.into())),
            };

            if key == "xmlns" {
                namespaces.push(NamespaceDecl { prefix: None, uri: value });
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                namespaces.push(NamespaceDecl {
                    prefix: Some(prefix.to_string()),
                    uri: value,
                });
            } else {
                attrs.push(Attribute {
                    name: QName::parse(&key),
                    value,
                });
            }
        }

        let parent = self.parent();
        let id = self.doc.append(
            parent,
            NodeData::Element {
                name: QName::parse(&raw_name),
                attrs,
                namespaces,
            },
        );
        if !empty {
            self.stack.push((id, raw_name));
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }

        match self.stack.iter().rposition(|(_, open)| open == name) {
            Some(pos) if pos + 1 == self.stack.len() => {
                self.stack.pop();
            }
            Some(pos) if self.options.recover => {
                tracing::debug!(element = %name, unclosed = self.stack.len() - pos - 1, "closing elements implicitly");
                self.stack.truncate(pos);
            }
            None if self.options.recover => {
                tracing::debug!(element = %name, "ignoring unmatched end tag");
            }
            _ => {
                let expected = self
                    .stack
                    .last()
                    .map(|(_, open)| format!(", expected </{}>", open))
                    .unwrap_or_default();
                return Err(Error::Malformed(format!(
                    "unexpected end tag </{}>{}",
                    name, expected
                )));
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        if self.skip_depth > 0 || text.is_empty() {
            return Ok(());
        }
        if self.stack.is_empty() {
            if text.trim().is_empty() {
                return Ok(());
            }
            if !self.options.recover {
                return Err(Error::Malformed(format!(
                    "text outside the root element: {:?}",
                    text.trim()
                )));
            }
            tracing::debug!("dropping text outside the root element");
            return Ok(());
        }
        let parent = self.parent();
        self.doc.append_text(parent, text);
        Ok(())
    }

    fn leaf(&mut self, data: NodeData) {
        if self.skip_depth > 0 {
            return;
        }
        let parent = self.parent();
        self.doc.append(parent, data);
    }

    fn finish(mut self) -> Result<Document> {
        if let Some((_, open)) = self.stack.last() {
            if !self.options.recover {
                return Err(Error::Malformed(format!("unclosed element <{}>", open)));
            }
            tracing::debug!(unclosed = self.stack.len(), "closing elements at end of input");
        }
        if self.options.no_blanks {
            self.doc.drop_blank_text();
        }
        Ok(self.doc)
    }
}

/// Resolve predefined and character entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}
