//! Byte-to-text decoding for fetched and on-disk documents.

use encoding_rs::Encoding;
use memchr::memmem;

use super::ParseOptions;
use crate::error::{Error, Result};

/// Decode raw document bytes to text.
///
/// The encoding is chosen in this order:
/// 1. `override_label`, when given (an unknown label is an error)
/// 2. a byte-order mark
/// 3. the `encoding` pseudo-attribute of the XML declaration
/// 4. UTF-8
///
/// Returns the text and the label to record on the parsed document. In
/// recover mode malformed sequences become U+FFFD and an unknown declared
/// label falls back to UTF-8; strict mode rejects both.
pub fn decode_document(
    bytes: &[u8],
    override_label: Option<&str>,
    options: ParseOptions,
) -> Result<(String, Option<String>)> {
    let (encoding, label) = if let Some(label) = override_label {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        (encoding, Some(label.to_string()))
    } else if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        (encoding, Some(encoding.name().to_string()))
    } else if let Some(declared) = declared_encoding(bytes) {
        match Encoding::for_label(declared.as_bytes()) {
            Some(encoding) => (encoding, Some(declared.to_string())),
            None if options.recover => {
                tracing::debug!(encoding = declared, "unknown declared encoding, decoding as UTF-8");
                (encoding_rs::UTF_8, Some(declared.to_string()))
            }
            None => return Err(Error::UnknownEncoding(declared.to_string())),
        }
    } else {
        (encoding_rs::UTF_8, None)
    };

    let (text, _, malformed) = encoding.decode(bytes);
    if malformed && !options.recover {
        return Err(Error::Malformed(format!(
            "byte sequence invalid for {}",
            encoding.name()
        )));
    }
    Ok((text.into_owned(), label))
}

/// Read the `encoding` pseudo-attribute from an ASCII-compatible declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let end = memmem::find(bytes, b"?>")?;
    let decl = &bytes[..end];
    let pos = memmem::find(decl, b"encoding")?;
    let rest = decl[pos + b"encoding".len()..].trim_ascii_start();
    let rest = rest.strip_prefix(b"=")?.trim_ascii_start();
    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value = &rest[1..];
    let close = memchr::memchr(quote, value)?;
    std::str::from_utf8(&value[..close]).ok()
}
