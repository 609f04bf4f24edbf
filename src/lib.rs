//! # modsulator
//!
//! Load MODS (Metadata Object Description Schema) bibliographic records and
//! extract application-ready values from them.
//!
//! ## Features
//!
//! - Parse records from text, bytes, files, URLs or a node of another document
//! - Read records namespace-qualified, or strip namespaces into a canonical
//!   unqualified tree
//! - Extract titles, personal and corporate names, and English language names
//! - Query any MODS element through named terms (`title_info.subTitle`)
//!
//! ## Quick Start
//!
//! ```
//! use modsulator::Record;
//!
//! let record: Record = r#"<mods xmlns="http://www.loc.gov/mods/v3">
//!   <titleInfo><title>MODS</title><subTitle>A Primer</subTitle></titleInfo>
//!   <name type="personal"><displayForm>Jane Doe</displayForm></name>
//!   <language><languageTerm type="code" authority="iso639-2b">eng</languageTerm></language>
//! </mods>"#.parse().unwrap();
//!
//! assert_eq!(record.full_titles(), vec!["MODS : A Primer"]);
//! assert_eq!(record.personal_names(), vec!["Jane Doe"]);
//! assert_eq!(record.languages(), vec!["English"]);
//! ```
//!
//! ## Term Queries
//!
//! Elements without a dedicated rule are reachable through the terminology:
//!
//! ```
//! use modsulator::{Record, RecordConfig};
//!
//! let mut record = Record::with_config(RecordConfig::new().with_namespace_aware(true));
//! record.load_str(r#"<mods xmlns="http://www.loc.gov/mods/v3">
//!   <originInfo><publisher>Tor</publisher></originInfo>
//! </mods>"#).unwrap();
//!
//! let publishers = record.call("origin_info", &["publisher"]).unwrap();
//! assert_eq!(publishers.texts(), vec!["Tor"]);
//! assert!(record.call("no_such_term", &[]).is_err());
//! ```

pub mod error;
pub mod extract;
pub mod iso639;
pub mod reader;
pub mod record;
pub mod terminology;
pub mod vocab;
pub mod xml;

pub use error::{Error, Result};
pub use reader::Reader;
pub use record::{DEFAULT_TITLE_DELIMITER, Record, RecordConfig};
pub use terminology::{MODS_NS_V3, ModsDocument, NodeSet, TermAccessor, TermNode, Terminology};
pub use xml::{Document, Node, ParseOptions};
