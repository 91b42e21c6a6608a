//!Converter for the binary XML format used by Android.
//!
//!This library decodes a compiled `AndroidManifest.xml` (or any other
//!binary XML document found inside an APK) from an in-memory buffer and
//!re-serializes it as plain-text XML. Decoding is deliberately lenient:
//!string-pool and namespace lookups that miss resolve to empty values,
//!and unrecognized chunk tags are skipped, so a single odd record does
//!not abort an otherwise-valid document. Only structural violations
//!(reads past the end of the buffer, a foreign chunk tag where the
//!string pool was expected) fail the decode.
//!
//!Style spans in the string pool are not decoded, and serialized
//!attribute values are emitted verbatim without XML escaping.
//!
//!Loading the buffer from disk is left to the caller; see the
//!`axml2xml-printer` crate for a minimal command-line front end.

mod binaryxml;
mod cursor;
mod namespace;
mod resource_value;
mod stringpool;
mod xml;

use thiserror::Error;

use crate::binaryxml::Decoder;
use crate::xml::TreeBuilder;

pub use crate::binaryxml::Listener;
pub use crate::xml::{Attribute, Element, Node, XmlDocument};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("read of {wanted} bytes at offset {offset} runs past the end of the input")]
    TruncatedInput { offset: usize, wanted: usize },

    #[error("expected chunk tag {expected:#010x}, found {found:#010x}")]
    MagicMismatch { expected: u32, found: u32 },
}

///Walks the binary XML chunk stream in `buf`, invoking the listener as
///each chunk is consumed.
///
///```rust
///use axml2xml::{analyse, Listener};
///# use axml2xml::ParseError;
///
///struct TagCounter(usize);
///
///impl Listener for TagCounter {
///    fn start_element(&mut self, _: &str, _: &str, _: &str, _: &[axml2xml::Attribute]) {
///        self.0 += 1;
///    }
///}
///
///let mut counter = TagCounter(0);
///analyse(&[], &mut counter)?;
///# Ok::<(), ParseError>(())
///```
pub fn analyse<L: Listener>(buf: &[u8], listener: &mut L) -> Result<(), ParseError> {
    Decoder::new(buf).run(listener)
}

///Parses a binary XML buffer and returns a [XmlDocument] object.
pub fn parse(buf: &[u8]) -> Result<XmlDocument, ParseError> {
    let mut builder = TreeBuilder::new();
    analyse(buf, &mut builder)?;
    Ok(builder.into_document())
}

///Parses a binary XML buffer and renders it as XML text, prefixed with
///the `<?xml version="1.0" encoding="utf-8"?>` declaration.
pub fn convert(buf: &[u8]) -> Result<String, ParseError> {
    Ok(parse(buf)?.to_xml())
}
