//! Parameter decoding on the receiving side.
//!
//! [`ParamReader`] walks one command's parameter bytes with a cursor. Reads
//! that would run past the end return `None` and leave the cursor where it
//! was.

use crate::wire::WireValue;

/// Cursor over a received parameter payload
#[derive(Debug, Clone)]
pub struct ParamReader<'a> {
    params: &'a [u8],
    cursor: usize,
}

impl<'a> ParamReader<'a> {
    /// Start reading at offset 0
    pub fn new(params: &'a [u8]) -> Self {
        Self { params, cursor: 0 }
    }

    /// Rewind the cursor to offset 0
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Current cursor offset
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.params.len() - self.cursor
    }

    /// Total parameter length
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Read the next value and advance past it
    pub fn next<T: WireValue>(&mut self) -> Option<T> {
        let value = T::read_from(&self.params[self.cursor..])?;
        self.cursor += T::SIZE;
        Some(value)
    }

    /// Read a value at a fixed offset without moving the cursor
    pub fn peek<T: WireValue>(&self, offset: usize) -> Option<T> {
        T::read_from(self.params.get(offset..)?)
    }

    /// Read a length-prefixed byte run and advance past it
    pub fn next_bytes(&mut self) -> Option<&'a [u8]> {
        let start = self.cursor;
        let len: u16 = self.next()?;
        let end = self.cursor + usize::from(len);
        match self.params.get(self.cursor..end) {
            Some(bytes) => {
                self.cursor = end;
                Some(bytes)
            }
            None => {
                self.cursor = start;
                None
            }
        }
    }

    /// Read a length-prefixed UTF-8 string and advance past it
    ///
    /// Returns `None` (cursor unchanged) if the run is truncated or is not
    /// valid UTF-8.
    pub fn next_str(&mut self) -> Option<&'a str> {
        let start = self.cursor;
        let bytes = self.next_bytes()?;
        match core::str::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(_) => {
                self.cursor = start;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::ParameterBuffer;
    use proptest::prelude::*;

    #[test]
    fn test_sequential_reads() {
        let params = [10, 0, 20, 0, 0x1F, 0x00];
        let mut reader = ParamReader::new(&params);

        assert_eq!(reader.next::<i16>(), Some(10));
        assert_eq!(reader.next::<i16>(), Some(20));
        assert_eq!(reader.next::<u16>(), Some(0x1F));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_is_none() {
        let params = [1, 2, 3];
        let mut reader = ParamReader::new(&params);

        assert_eq!(reader.next::<u16>(), Some(0x0201));
        assert_eq!(reader.next::<u16>(), None);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.next::<u8>(), Some(3));
        assert_eq!(reader.next::<u8>(), None);
    }

    #[test]
    fn test_empty_params() {
        let mut reader = ParamReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.next::<bool>(), None);
        assert_eq!(reader.next_bytes(), None);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let params = [0xAA, 0x34, 0x12];
        let reader = ParamReader::new(&params);

        assert_eq!(reader.peek::<u16>(1), Some(0x1234));
        assert_eq!(reader.peek::<u16>(2), None);
        assert_eq!(reader.peek::<u8>(5), None);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_reset_rewinds() {
        let params = [5, 6];
        let mut reader = ParamReader::new(&params);
        assert_eq!(reader.next::<u8>(), Some(5));
        reader.reset();
        assert_eq!(reader.next::<u8>(), Some(5));
    }

    #[test]
    fn test_string() {
        let params = [5, 0, b'h', b'e', b'l', b'l', b'o', 0xFF];
        let mut reader = ParamReader::new(&params);
        assert_eq!(reader.next_str(), Some("hello"));
        assert_eq!(reader.next::<u8>(), Some(0xFF));
    }

    #[test]
    fn test_truncated_string_keeps_cursor() {
        // Claims 9 bytes, only 3 present
        let params = [9, 0, b'a', b'b', b'c'];
        let mut reader = ParamReader::new(&params);
        assert_eq!(reader.next_str(), None);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_invalid_utf8_keeps_cursor() {
        let params = [2, 0, 0xC3, 0x28];
        let mut reader = ParamReader::new(&params);
        assert_eq!(reader.next_str(), None);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.next_bytes(), Some(&[0xC3, 0x28][..]));
    }

    proptest! {
        #[test]
        fn prop_i16_roundtrip(value: i16) {
            let mut buf: ParameterBuffer<8> = ParameterBuffer::new();
            buf.push_i16(value).unwrap();
            prop_assert_eq!(ParamReader::new(buf.as_bytes()).next::<i16>(), Some(value));
        }

        #[test]
        fn prop_u16_roundtrip(value: u16) {
            let mut buf: ParameterBuffer<8> = ParameterBuffer::new();
            buf.push_u16(value).unwrap();
            prop_assert_eq!(ParamReader::new(buf.as_bytes()).next::<u16>(), Some(value));
        }

        #[test]
        fn prop_i32_roundtrip(value: i32) {
            let mut buf: ParameterBuffer<8> = ParameterBuffer::new();
            buf.append(value).unwrap();
            prop_assert_eq!(buf.len(), 4);
            prop_assert_eq!(ParamReader::new(buf.as_bytes()).next::<i32>(), Some(value));
        }

        #[test]
        fn prop_u32_roundtrip(value: u32) {
            let mut buf: ParameterBuffer<8> = ParameterBuffer::new();
            buf.append(value).unwrap();
            let mut reader = ParamReader::new(buf.as_bytes());
            prop_assert_eq!(reader.next::<u32>(), Some(value));
            prop_assert_eq!(reader.next::<u8>(), None);
        }

        #[test]
        fn prop_small_values_roundtrip(a: i8, b: u8, c: bool) {
            let mut buf: ParameterBuffer<8> = ParameterBuffer::new();
            buf.push_i8(a).unwrap();
            buf.push_u8(b).unwrap();
            buf.push_bool(c).unwrap();

            let mut reader = ParamReader::new(buf.as_bytes());
            prop_assert_eq!(reader.next::<i8>(), Some(a));
            prop_assert_eq!(reader.next::<u8>(), Some(b));
            prop_assert_eq!(reader.next::<bool>(), Some(c));
            prop_assert_eq!(reader.next::<u8>(), None);
        }

        #[test]
        fn prop_string_roundtrip(text in "\\PC{0,64}") {
            let mut buf: ParameterBuffer<512> = ParameterBuffer::new();
            buf.append_str(&text).unwrap();
            let mut reader = ParamReader::new(buf.as_bytes());
            prop_assert_eq!(reader.next_str(), Some(text.as_str()));
        }

        #[test]
        fn prop_reads_stay_in_bounds(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
            let mut reader = ParamReader::new(&bytes);
            let mut consumed = 0;
            while let Some(_) = reader.next::<u16>() {
                consumed += 2;
            }
            prop_assert_eq!(consumed, bytes.len() / 2 * 2);
            prop_assert!(reader.position() <= bytes.len());
        }
    }
}
