use log::debug;

use crate::cursor::ByteCursor;
use crate::namespace::NamespaceScope;
use crate::resource_value::ResourceValue;
use crate::stringpool::{StringPool, NO_ENTRY};
use crate::xml::Attribute;
use crate::ParseError;

pub(crate) const WORD_START_DOCUMENT: u32 = 0x0008_0003;

pub(crate) const WORD_STRING_TABLE: u32 = 0x001C_0001;
pub(crate) const WORD_RES_TABLE: u32 = 0x0008_0180;

pub(crate) const WORD_START_NS: u32 = 0x0010_0100;
pub(crate) const WORD_END_NS: u32 = 0x0010_0101;
pub(crate) const WORD_START_TAG: u32 = 0x0010_0102;
pub(crate) const WORD_END_TAG: u32 = 0x0010_0103;
pub(crate) const WORD_TEXT: u32 = 0x0010_0104;
pub(crate) const WORD_EOS: u32 = 0xFFFF_FFFF;

const WORD_SIZE: usize = 4;

///Receiver for the events emitted while walking the chunk stream.
///
///Every method defaults to a no-op, so an implementation observes only
///the events it cares about.
#[allow(unused_variables)]
pub trait Listener {
    ///The document-header chunk was read.
    fn start_document(&mut self) {}

    ///The end of the stream was reached. Fired exactly once per
    ///[analyse](crate::analyse) call.
    fn end_document(&mut self) {}

    ///A namespace mapping enters scope.
    fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) {}

    ///A namespace mapping leaves scope.
    fn end_prefix_mapping(&mut self, prefix: &str, uri: &str) {}

    ///An element opens. `q_name` carries the prefix-qualified name when
    ///the element's namespace resolves to an active prefix.
    fn start_element(&mut self, uri: &str, local_name: &str, q_name: &str, attrs: &[Attribute]) {}

    ///An element closes.
    fn end_element(&mut self, uri: &str, local_name: &str, q_name: &str) {}

    ///A text chunk was read inside the current element.
    fn character_data(&mut self, data: &str) {}
}

///All mutable state of one decode pass: the scan offset plus the tables
///built from header chunks. One instance per [analyse](crate::analyse)
///call, so independent buffers decode independently.
pub(crate) struct Decoder<'a> {
    cursor: ByteCursor<'a>,
    pos: usize,
    strings: StringPool,
    resource_ids: Vec<u32>,
    namespaces: NamespaceScope,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Decoder {
            cursor: ByteCursor::new(buf),
            pos: 0,
            strings: StringPool::default(),
            resource_ids: Vec::new(),
            namespaces: NamespaceScope::new(),
        }
    }

    ///Walks the stream chunk by chunk, dispatching on the 32-bit tag
    ///word at the current offset. Unrecognized tags are skipped one word
    ///at a time rather than treated as fatal.
    pub(crate) fn run<L: Listener>(&mut self, listener: &mut L) -> Result<(), ParseError> {
        let mut ended = false;

        while self.pos < self.cursor.len() {
            let word0 = self.cursor.read_u32_le(self.pos)?;
            match word0 {
                WORD_START_DOCUMENT => {
                    listener.start_document();
                    self.pos += 2 * WORD_SIZE;
                }
                WORD_STRING_TABLE => self.parse_string_table()?,
                WORD_RES_TABLE => self.parse_resource_table()?,
                WORD_START_NS => self.parse_namespace(true, listener)?,
                WORD_END_NS => self.parse_namespace(false, listener)?,
                WORD_START_TAG => self.parse_start_tag(listener)?,
                WORD_END_TAG => self.parse_end_tag(listener)?,
                WORD_TEXT => self.parse_text(listener)?,
                WORD_EOS => {
                    listener.end_document();
                    ended = true;
                    break;
                }
                other => {
                    debug!(
                        "skipping unrecognized chunk tag {other:#010x} at offset {}",
                        self.pos
                    );
                    self.pos += WORD_SIZE;
                }
            }
        }

        if !ended {
            listener.end_document();
        }

        Ok(())
    }

    fn parse_string_table(&mut self) -> Result<(), ParseError> {
        let (pool, consumed) = StringPool::decode(&self.cursor, self.pos)?;
        self.strings = pool;
        // A zero-sized chunk must still advance or the scan stalls.
        self.pos += consumed.max(WORD_SIZE);
        Ok(())
    }

    ///The resource-ID table is retained for the rest of the pass but
    ///emits no event.
    fn parse_resource_table(&mut self) -> Result<(), ParseError> {
        let chunk_size = self.cursor.read_u32_le(self.pos + WORD_SIZE)? as usize;
        let count = (chunk_size / WORD_SIZE).saturating_sub(2);

        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            ids.push(self.cursor.read_u32_le(self.pos + (i + 2) * WORD_SIZE)?);
        }
        self.resource_ids = ids;

        self.pos += chunk_size.max(WORD_SIZE);
        Ok(())
    }

    fn parse_namespace<L: Listener>(
        &mut self,
        start: bool,
        listener: &mut L,
    ) -> Result<(), ParseError> {
        let prefix_idx = self.cursor.read_u32_le(self.pos + 4 * WORD_SIZE)?;
        let uri_idx = self.cursor.read_u32_le(self.pos + 5 * WORD_SIZE)?;

        let prefix = self.strings.get(prefix_idx).unwrap_or_default().to_string();
        let uri = self.strings.get(uri_idx).unwrap_or_default().to_string();

        if start {
            listener.start_prefix_mapping(&prefix, &uri);
            self.namespaces.push(uri, prefix);
        } else {
            listener.end_prefix_mapping(&prefix, &uri);
            self.namespaces.pop(&uri);
        }

        self.pos += 6 * WORD_SIZE;
        Ok(())
    }

    fn parse_start_tag<L: Listener>(&mut self, listener: &mut L) -> Result<(), ParseError> {
        let uri_idx = self.cursor.read_u32_le(self.pos + 4 * WORD_SIZE)?;
        let name_idx = self.cursor.read_u32_le(self.pos + 5 * WORD_SIZE)?;
        let attr_count = self.cursor.read_u16_le(self.pos + 7 * WORD_SIZE)? as usize;

        let name = self.strings.get(name_idx).unwrap_or_default().to_string();
        let (uri, q_name) = self.qualify(uri_idx, &name);

        self.pos += 9 * WORD_SIZE;

        let mut attrs = Vec::with_capacity(attr_count);
        for _ in 0..attr_count {
            attrs.push(self.parse_attribute()?);
            self.pos += 5 * WORD_SIZE;
        }

        listener.start_element(&uri, &name, &q_name, &attrs);
        Ok(())
    }

    ///Decodes one fixed 20-byte attribute record at the current offset.
    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let ns_idx = self.cursor.read_u32_le(self.pos)?;
        let name_idx = self.cursor.read_u32_le(self.pos + WORD_SIZE)?;
        let value_idx = self.cursor.read_u32_le(self.pos + 2 * WORD_SIZE)?;
        let value_type = self.cursor.read_u32_le(self.pos + 3 * WORD_SIZE)?;
        let data = self.cursor.read_u32_le(self.pos + 4 * WORD_SIZE)?;

        let name = self.strings.get(name_idx).unwrap_or_default().to_string();

        // An attribute only carries a namespace when its URI is bound to
        // an active prefix; otherwise both fields stay unset.
        let (namespace, prefix) = if ns_idx == NO_ENTRY {
            (None, None)
        } else {
            match self.strings.get(ns_idx) {
                Some(uri) => match self.namespaces.prefix_for(uri) {
                    Some(prefix) => (Some(uri.to_string()), Some(prefix.to_string())),
                    None => (None, None),
                },
                None => (None, None),
            }
        };

        let value = if value_idx == NO_ENTRY {
            ResourceValue::new(value_type, data).get_value(&self.strings)
        } else {
            self.strings.get(value_idx).unwrap_or_default().to_string()
        };

        Ok(Attribute {
            name,
            namespace,
            prefix,
            value,
        })
    }

    fn parse_end_tag<L: Listener>(&mut self, listener: &mut L) -> Result<(), ParseError> {
        let uri_idx = self.cursor.read_u32_le(self.pos + 4 * WORD_SIZE)?;
        let name_idx = self.cursor.read_u32_le(self.pos + 5 * WORD_SIZE)?;

        let name = self.strings.get(name_idx).unwrap_or_default().to_string();
        let (uri, q_name) = self.qualify(uri_idx, &name);

        listener.end_element(&uri, &name, &q_name);

        self.pos += 6 * WORD_SIZE;
        Ok(())
    }

    fn parse_text<L: Listener>(&mut self, listener: &mut L) -> Result<(), ParseError> {
        let str_idx = self.cursor.read_u32_le(self.pos + 4 * WORD_SIZE)?;

        let data = self.strings.get(str_idx).unwrap_or_default().to_string();
        listener.character_data(&data);

        self.pos += 7 * WORD_SIZE;
        Ok(())
    }

    ///Resolves a tag's namespace URI and qualified name. The `NO_ENTRY`
    ///sentinel means the default namespace; a URI without an active
    ///prefix leaves the name unqualified.
    fn qualify(&self, uri_idx: u32, name: &str) -> (String, String) {
        if uri_idx == NO_ENTRY {
            return (String::new(), name.to_string());
        }

        let uri = self.strings.get(uri_idx).unwrap_or_default().to_string();
        let q_name = match self.namespaces.prefix_for(&uri) {
            Some(prefix) => format!("{prefix}:{name}"),
            None => name.to_string(),
        };
        (uri, q_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sink;

    impl Listener for Sink {}

    fn words(values: &[u32]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(values.len() * 4);
        for value in values {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        buf
    }

    #[test]
    fn resource_table_ids_are_retained() {
        let buf = words(&[WORD_RES_TABLE, 16, 0x0101_0001, 0x0101_0002]);

        let mut decoder = Decoder::new(&buf);
        decoder.run(&mut Sink).unwrap();

        assert_eq!(decoder.resource_ids, vec![0x0101_0001, 0x0101_0002]);
    }

    #[test]
    fn a_zero_sized_resource_table_does_not_stall_the_scan() {
        let buf = words(&[WORD_RES_TABLE, 0, WORD_EOS]);

        let mut decoder = Decoder::new(&buf);
        decoder.run(&mut Sink).unwrap();
    }

    #[test]
    fn a_bare_word_is_skipped() {
        let buf = words(&[0x0000_0042]);

        let mut decoder = Decoder::new(&buf);
        decoder.run(&mut Sink).unwrap();
    }

    #[test]
    fn a_trailing_partial_word_is_fatal() {
        let mut buf = words(&[WORD_START_DOCUMENT, 8]);
        buf.extend_from_slice(&[0x01, 0x02]);

        let mut decoder = Decoder::new(&buf);
        assert!(matches!(
            decoder.run(&mut Sink),
            Err(ParseError::TruncatedInput { .. })
        ));
    }
}
