use log::debug;

use crate::binaryxml::WORD_STRING_TABLE;
use crate::cursor::ByteCursor;
use crate::ParseError;

const WORD_SIZE: usize = 4;

///Index value used throughout the stream to mean "no string".
pub(crate) const NO_ENTRY: u32 = 0xFFFF_FFFF;

///The interned string table referenced by index everywhere else in the
///document.
#[derive(Debug, Default)]
pub(crate) struct StringPool {
    strings: Vec<String>,
}

impl StringPool {
    ///Decodes the string-pool chunk starting at `chunk_start`.
    ///
    ///Returns the pool together with the chunk's declared byte length so
    ///the dispatcher can skip the whole chunk in one step.
    pub(crate) fn decode(
        cursor: &ByteCursor<'_>,
        chunk_start: usize,
    ) -> Result<(Self, usize), ParseError> {
        let tag = cursor.read_u32_le(chunk_start)?;
        if tag != WORD_STRING_TABLE {
            return Err(ParseError::MagicMismatch {
                expected: WORD_STRING_TABLE,
                found: tag,
            });
        }

        let chunk_size = cursor.read_u32_le(chunk_start + WORD_SIZE)? as usize;
        let string_count = cursor.read_u32_le(chunk_start + 2 * WORD_SIZE)? as usize;
        let style_count = cursor.read_u32_le(chunk_start + 3 * WORD_SIZE)? as usize;
        let _flags = cursor.read_u32_le(chunk_start + 4 * WORD_SIZE)?;
        let string_data_start =
            chunk_start + cursor.read_u32_le(chunk_start + 5 * WORD_SIZE)? as usize;
        let style_offset = cursor.read_u32_le(chunk_start + 6 * WORD_SIZE)?;

        let mut strings = Vec::with_capacity(string_count);
        for i in 0..string_count {
            let offset = string_data_start
                + cursor.read_u32_le(chunk_start + (i + 7) * WORD_SIZE)? as usize;
            strings.push(read_utf16_string(cursor, offset)?);
        }

        if style_count > 0 {
            // TODO: decode style spans (the chunk keeps them at
            // `style_offset`, one entry per styled string).
            debug!("skipping {style_count} style entries at chunk offset {style_offset}");
        }

        debug!("decoded string pool with {} entries", strings.len());

        Ok((StringPool { strings }, chunk_size))
    }

    ///Looks up a string by stream index. The `NO_ENTRY` sentinel and any
    ///out-of-range index resolve to `None` rather than an error.
    pub(crate) fn get(&self, index: u32) -> Option<&str> {
        if index == NO_ENTRY {
            return None;
        }
        self.strings.get(index as usize).map(String::as_str)
    }
}

///Reads one length-prefixed UTF-16 entry: a 16-bit code-unit count
///followed by that many little-endian code units. Code points are taken
///directly from the 16-bit units; malformed sequences degrade to the
///replacement character.
fn read_utf16_string(cursor: &ByteCursor<'_>, offset: usize) -> Result<String, ParseError> {
    let len = cursor.read_u16_le(offset)? as usize;
    let payload = cursor.slice(offset + 2, offset + 2 + len * 2)?;

    let mut units = Vec::with_capacity(len);
    for pair in payload.chunks_exact(2) {
        units.push(u16::from_le_bytes([pair[0], pair[1]]));
    }

    Ok(String::from_utf16_lossy(&units))
}
