use byteorder::{BigEndian, ByteOrder};

use crate::error::{DecodeError, DecodeResult};

/// Read position inside a map block record.
/// Every read checks bounds first, so a failed read leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct BlockCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BlockCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Returns the current cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left between the cursor and the end of the record.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Moves the cursor to an absolute offset, which may be the end of the record.
    pub fn seek(&mut self, position: usize, context: &'static str) -> DecodeResult<()> {
        if position > self.data.len() {
            return Err(DecodeError::TruncatedData {
                context,
                offset: self.data.len(),
                needed: position - self.data.len(),
                available: 0,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Returns the next `count` bytes and advances past them.
    pub fn read_bytes(&mut self, count: usize, context: &'static str) -> DecodeResult<&'a [u8]> {
        let available = self.remaining();
        if count > available {
            return Err(DecodeError::TruncatedData {
                context,
                offset: self.position,
                needed: count,
                available,
            });
        }
        let data = self.data;
        let bytes = &data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    pub fn skip(&mut self, count: usize, context: &'static str) -> DecodeResult<()> {
        self.read_bytes(count, context).map(|_| ())
    }

    pub fn read_u8(&mut self, context: &'static str) -> DecodeResult<u8> {
        Ok(self.read_bytes(1, context)?[0])
    }

    /// Reads a u16 in network (big-endian) order.
    pub fn read_u16(&mut self, context: &'static str) -> DecodeResult<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2, context)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_read_sequence() {
        let data = [0x1c, 0x01, 0x02, 0xAA, 0xBB, 0xCC];
        let mut cursor = BlockCursor::new(&data);

        assert_eq!(cursor.read_u8("version").unwrap(), 0x1c);
        assert_eq!(cursor.read_u16("count").unwrap(), 0x0102);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read_bytes(2, "body").unwrap(), &[0xAA, 0xBB]);
        assert_eq!(cursor.remaining(), 1);
        cursor.skip(1, "tail").unwrap();
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_keeps_position() {
        let data = [0x00];
        let mut cursor = BlockCursor::new(&data);

        let result = cursor.read_u16("count");
        assert_matches!(
            result,
            Err(DecodeError::TruncatedData {
                context: "count",
                offset: 0,
                needed: 2,
                available: 1,
            })
        );
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_seek_bounds() {
        let data = [0u8; 4];
        let mut cursor = BlockCursor::new(&data);

        cursor.seek(4, "end").unwrap();
        assert_eq!(cursor.remaining(), 0);
        cursor.seek(1, "back").unwrap();
        assert_matches!(
            cursor.seek(7, "past end"),
            Err(DecodeError::TruncatedData {
                context: "past end",
                offset: 4,
                needed: 3,
                available: 0,
            })
        );
        assert_eq!(cursor.position(), 1);
    }
}
