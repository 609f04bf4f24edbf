//! Reader tests.
//!
//! Loading records from every input kind and the namespace normalization
//! applied before a tree is handed back.

use std::io::Write;

use modsulator::{Error, MODS_NS_V3, ParseOptions, Reader};
use proptest::prelude::*;
use tempfile::NamedTempFile;

const QUALIFIED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mods:mods xmlns:mods="http://www.loc.gov/mods/v3"
    xmlns:xlink="http://www.w3.org/1999/xlink"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://www.loc.gov/mods/v3 http://www.loc.gov/standards/mods/v3/mods-3-3.xsd"
    version="3.3">
  <mods:titleInfo>
    <mods:title>Annals of the Former World</mods:title>
  </mods:titleInfo>
  <mods:location>
    <mods:url xlink:href="http://example.org/annals">online</mods:url>
  </mods:location>
</mods:mods>"#;

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_namespace_aware_load_keeps_qualification() {
    let doc = Reader::default().from_str(QUALIFIED).unwrap();
    let root = doc.root().unwrap();

    assert_eq!(root.name().unwrap().to_string(), "mods:mods");
    assert_eq!(root.namespace_uri(), Some(MODS_NS_V3));
    assert!(root.attribute("schemaLocation").is_some());
}

#[test]
fn test_namespace_free_load_is_canonical() {
    let doc = Reader::new(false).from_str(QUALIFIED).unwrap();
    let root = doc.root().unwrap();

    assert_eq!(root.name().unwrap().to_string(), "mods");
    assert!(root.attribute("schemaLocation").is_none());
    assert_eq!(root.attribute("version"), Some("3.3"));

    for node in root.descendants().filter(|n| n.is_element()) {
        assert!(node.name().unwrap().prefix.is_none());
        assert!(node.namespaces().is_empty());
        assert!(node.attributes().iter().all(|a| a.name.prefix.is_none()));
    }

    let url = root
        .descendants()
        .find(|n| n.local_name() == Some("url"))
        .unwrap();
    assert_eq!(url.attribute("href"), Some("http://example.org/annals"));
}

#[test]
fn test_schema_location_only_removed_from_root() {
    let xml = r#"<mods schemaLocation="a b"><extension schemaLocation="c d"/></mods>"#;
    let doc = Reader::new(false).from_str(xml).unwrap();
    let root = doc.root().unwrap();

    assert!(root.attribute("schemaLocation").is_none());
    let extension = root.elements().next().unwrap();
    assert_eq!(extension.attribute("schemaLocation"), Some("c d"));
}

#[test]
fn test_normalize_twice_is_stable() {
    let reader = Reader::new(false);
    let once = reader.from_str(QUALIFIED).unwrap();
    let twice = reader.normalize(once.clone()).unwrap();

    assert_eq!(once.to_xml(), twice.to_xml());
}

#[test]
fn test_empty_input_is_valid() {
    for reader in [Reader::new(true), Reader::new(false)] {
        let doc = reader.from_str("").unwrap();
        assert!(doc.root().is_none());
    }

    let strict = Reader::new(false).with_parse_options(ParseOptions::strict());
    assert!(strict.from_str("").unwrap().root().is_none());
}

// ============================================================================
// Input kinds
// ============================================================================

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(QUALIFIED.as_bytes()).unwrap();

    let doc = Reader::new(false).from_file(file.path()).unwrap();
    assert_eq!(doc.encoding(), Some("UTF-8"));
    assert_eq!(doc.root().unwrap().local_name(), Some("mods"));
}

#[test]
fn test_from_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let result = Reader::default().from_file(dir.path().join("absent.xml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_from_bytes_declared_latin1() {
    let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><mods><titleInfo><title>Fran"#.to_vec();
    bytes.push(0xE7);
    bytes.extend_from_slice(b"ais</title></titleInfo></mods>");

    let doc = Reader::new(false).from_bytes(&bytes, None).unwrap();
    assert_eq!(doc.root().unwrap().text(), "Français");
    assert_eq!(doc.encoding(), Some("ISO-8859-1"));
}

#[test]
fn test_from_bytes_unknown_override() {
    let result = Reader::default().from_bytes(b"<mods/>", Some("no-such-charset"));
    assert!(matches!(result, Err(Error::UnknownEncoding(label)) if label == "no-such-charset"));
}

#[test]
fn test_from_url_connection_refused() {
    let result = Reader::default().from_url(
        "http://127.0.0.1:1/record.xml",
        None,
        ParseOptions::default(),
    );
    assert!(matches!(result, Err(Error::Fetch(_))));
}

#[test]
fn test_from_node_drops_siblings_and_ancestors() {
    let xml = r#"<wrapper xmlns:m="http://www.loc.gov/mods/v3">
  <m:mods><m:titleInfo><m:title>Kept</m:title></m:titleInfo></m:mods>
  <m:mods><m:titleInfo><m:title>Sibling</m:title></m:titleInfo></m:mods>
</wrapper>"#;
    let source = Reader::default().from_str(xml).unwrap();
    let first = source.root().unwrap().elements().next().unwrap();

    let aware = Reader::default().from_node(first).unwrap();
    let root = aware.root().unwrap();
    assert_eq!(root.namespace_uri(), Some(MODS_NS_V3));
    assert_eq!(root.text(), "Kept");
    assert_eq!(aware.document_node().elements().count(), 1);

    let free = Reader::new(false).from_node(first).unwrap();
    assert_eq!(free.root().unwrap().to_xml(), "<mods><titleInfo><title>Kept</title></titleInfo></mods>");
}

// ============================================================================
// Properties
// ============================================================================

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(
        title in "[A-Za-z][A-Za-z0-9 ,.&<']{0,24}",
        note in "[ A-Za-z]{0,12}",
        prefixed in any::<bool>(),
    ) {
        let (open, close) = if prefixed { ("m:", "m:") } else { ("", "") };
        let xml = format!(
            r#"<{open}mods xmlns{decl}="http://www.loc.gov/mods/v3" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="x y"><{open}titleInfo><{open}title>{}</{close}title></{close}titleInfo><{open}note>{}</{close}note></{close}mods>"#,
            escape(&title),
            note,
            decl = if prefixed { ":m" } else { "" },
        );
        let reader = Reader::new(false);
        let once = reader.from_str(&xml).unwrap();
        let twice = reader.normalize(once.clone()).unwrap();
        prop_assert_eq!(once.to_xml(), twice.to_xml());
        prop_assert!(once.root().unwrap().attribute("schemaLocation").is_none());
    }
}
