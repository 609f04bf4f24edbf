//! The MODS record facade.

use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::extract;
use crate::reader::Reader;
use crate::terminology::{MODS_NS_V3, ModsDocument, NodeSet, TermAccessor, Terminology};
use crate::xml::{Document, Node, ParseOptions};

/// Joins a title and its subtitle unless overridden.
pub const DEFAULT_TITLE_DELIMITER: &str = " : ";

/// Load and extraction settings for a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConfig {
    /// Match elements in `namespace_uri` rather than stripping namespaces.
    pub namespace_aware: bool,
    pub title_delimiter: String,
    pub namespace_uri: String,
    pub parse_options: ParseOptions,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            namespace_aware: false,
            title_delimiter: DEFAULT_TITLE_DELIMITER.to_string(),
            namespace_uri: MODS_NS_V3.to_string(),
            parse_options: ParseOptions::default(),
        }
    }
}

impl RecordConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace_aware(mut self, namespace_aware: bool) -> Self {
        self.namespace_aware = namespace_aware;
        self
    }

    pub fn with_title_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.title_delimiter = delimiter.into();
        self
    }

    pub fn with_namespace_uri(mut self, uri: impl Into<String>) -> Self {
        self.namespace_uri = uri.into();
        self
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    fn reader(&self) -> Reader {
        Reader::new(self.namespace_aware).with_parse_options(self.parse_options)
    }

    fn terminology(&self) -> Terminology {
        if self.namespace_aware {
            Terminology::namespace_aware(self.namespace_uri.clone())
        } else {
            Terminology::namespace_free()
        }
    }
}

/// One MODS record: a canonical tree plus the rules that read it.
///
/// A record starts empty. Each `load_*` call replaces the whole tree.
///
/// ```
/// use modsulator::Record;
///
/// let record: Record = r#"<mods xmlns="http://www.loc.gov/mods/v3">
///   <titleInfo><nonSort>The</nonSort><title>Hobbit</title></titleInfo>
/// </mods>"#.parse().unwrap();
/// assert_eq!(record.short_titles(), vec!["The Hobbit"]);
/// ```
#[derive(Debug, Clone)]
pub struct Record {
    mods: ModsDocument,
    config: RecordConfig,
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Record {
    type Err = Error;

    /// Load `text` with the default (namespace-free) configuration.
    fn from_str(text: &str) -> Result<Self> {
        let mut record = Record::new();
        record.load_str(text)?;
        Ok(record)
    }
}

impl Record {
    /// An empty record with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RecordConfig::default())
    }

    pub fn with_config(config: RecordConfig) -> Self {
        let mods = ModsDocument::new(Document::new(), config.terminology());
        Self { mods, config }
    }

    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    pub fn title_delimiter(&self) -> &str {
        &self.config.title_delimiter
    }

    pub fn set_title_delimiter(&mut self, delimiter: impl Into<String>) {
        self.config.title_delimiter = delimiter.into();
    }

    pub fn load_str(&mut self, text: &str) -> Result<()> {
        let doc = self.config.reader().from_str(text)?;
        self.replace(doc);
        Ok(())
    }

    pub fn load_bytes(&mut self, bytes: &[u8], encoding: Option<&str>) -> Result<()> {
        let doc = self.config.reader().from_bytes(bytes, encoding)?;
        self.replace(doc);
        Ok(())
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let doc = self.config.reader().from_file(path)?;
        self.replace(doc);
        Ok(())
    }

    pub fn load_url(&mut self, url: &str) -> Result<()> {
        let doc = self
            .config
            .reader()
            .from_url(url, None, self.config.parse_options)?;
        self.replace(doc);
        Ok(())
    }

    /// Load the record rooted at `node`, typically one `mods` element of a
    /// `modsCollection`.
    pub fn load_node(&mut self, node: Node<'_>) -> Result<()> {
        let doc = self.config.reader().from_node(node)?;
        self.replace(doc);
        Ok(())
    }

    fn replace(&mut self, doc: Document) {
        self.mods = ModsDocument::new(doc, self.config.terminology());
    }

    /// The canonical tree and its terminology.
    pub fn mods(&self) -> &ModsDocument {
        &self.mods
    }

    pub fn document(&self) -> &Document {
        self.mods.document()
    }

    /// `ID` attribute of the root.
    pub fn id(&self) -> Option<&str> {
        self.mods.root()?.unqualified_attribute("ID")
    }

    /// `version` attribute of the root.
    pub fn version(&self) -> Option<&str> {
        self.mods.root()?.unqualified_attribute("version")
    }

    pub fn short_titles(&self) -> Vec<String> {
        extract::short_titles(&self.mods)
    }

    pub fn full_titles(&self) -> Vec<String> {
        extract::full_titles(&self.mods, &self.config.title_delimiter)
    }

    pub fn alternative_titles(&self) -> Vec<String> {
        extract::alternative_titles(&self.mods)
    }

    pub fn sort_title(&self) -> Option<String> {
        extract::sort_title(&self.mods, &self.config.title_delimiter)
    }

    pub fn personal_names(&self) -> Vec<String> {
        extract::personal_names(&self.mods)
    }

    pub fn corporate_names(&self) -> Vec<String> {
        extract::corporate_names(&self.mods)
    }

    pub fn languages(&self) -> Vec<String> {
        extract::languages(&self.mods)
    }

    /// Resolve a term and a chain of sub-terms.
    ///
    /// Fails with [`Error::UnsupportedOperation`] naming the first term the
    /// terminology does not know.
    pub fn call(&self, term: &str, path: &[&str]) -> Result<NodeSet<'_>> {
        if !self.mods.supports(term) {
            return Err(Error::UnsupportedOperation(term.to_string()));
        }
        let mut set = self.mods.select(term)?;
        for sub in path {
            set = set.get(sub)?;
        }
        Ok(set)
    }

    /// [`Record::call`] with a dotted path such as `name.role.roleTerm`.
    pub fn query(&self, dotted: &str) -> Result<NodeSet<'_>> {
        let mut parts = dotted.split('.');
        let term = parts.next().unwrap_or_default();
        let path: Vec<&str> = parts.collect();
        self.call(term, &path)
    }
}
