use byteorder::ByteOrder;
use byteorder::LittleEndian;

use crate::ParseError;

///Bounds-checked reader over the raw input buffer.
///
///All reads address absolute byte offsets; the scan position belongs to
///the chunk decoder, not to the cursor.
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        ByteCursor { data }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn read_u16_le(&self, offset: usize) -> Result<u16, ParseError> {
        let end = offset
            .checked_add(2)
            .ok_or(ParseError::TruncatedInput { offset, wanted: 2 })?;
        if end > self.data.len() {
            return Err(ParseError::TruncatedInput { offset, wanted: 2 });
        }
        Ok(LittleEndian::read_u16(&self.data[offset..end]))
    }

    pub(crate) fn read_u32_le(&self, offset: usize) -> Result<u32, ParseError> {
        let end = offset
            .checked_add(4)
            .ok_or(ParseError::TruncatedInput { offset, wanted: 4 })?;
        if end > self.data.len() {
            return Err(ParseError::TruncatedInput { offset, wanted: 4 });
        }
        Ok(LittleEndian::read_u32(&self.data[offset..end]))
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> Result<&'a [u8], ParseError> {
        if start > end || end > self.data.len() {
            return Err(ParseError::TruncatedInput {
                offset: start,
                wanted: end.saturating_sub(start),
            });
        }
        Ok(&self.data[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_words() {
        let cursor = ByteCursor::new(&[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(cursor.read_u16_le(0).unwrap(), 0x0201);
        assert_eq!(cursor.read_u16_le(2).unwrap(), 0x0403);
        assert_eq!(cursor.read_u32_le(0).unwrap(), 0x04030201);
    }

    #[test]
    fn rejects_reads_past_the_end() {
        let cursor = ByteCursor::new(&[0x01, 0x02, 0x03, 0x04]);
        assert!(matches!(
            cursor.read_u32_le(1),
            Err(ParseError::TruncatedInput { offset: 1, .. })
        ));
        assert!(matches!(
            cursor.read_u16_le(3),
            Err(ParseError::TruncatedInput { .. })
        ));
        assert!(matches!(
            cursor.read_u32_le(usize::MAX),
            Err(ParseError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn slices_are_bounds_checked() {
        let cursor = ByteCursor::new(&[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(cursor.slice(1, 3).unwrap(), &[0x02, 0x03]);
        assert!(cursor.slice(2, 5).is_err());
        assert!(cursor.slice(3, 2).is_err());
    }
}
