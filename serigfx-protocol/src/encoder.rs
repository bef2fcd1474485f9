//! Parameter encoding on the sending side.
//!
//! A [`ParameterBuffer`] holds the serialized arguments of exactly one
//! command. Values are appended in the order the receiver reads them; the
//! buffer is reused for every command and never reset implicitly.

use heapless::Vec;

use crate::wire::{WireValue, MAX_PARAMETER_LENGTH, STRING_LENGTH_PREFIX};

/// Errors that can occur while encoding parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The value does not fit in the remaining capacity
    CapacityExceeded { needed: usize, remaining: usize },
    /// String longer than its 16-bit length prefix can express
    StringTooLong { len: usize },
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::CapacityExceeded { needed, remaining } => write!(
                f,
                "parameter needs {needed} bytes but only {remaining} remain"
            ),
            EncodeError::StringTooLong { len } => {
                write!(f, "string of {len} bytes exceeds the length prefix")
            }
        }
    }
}

/// Fixed-capacity parameter scratch buffer
#[derive(Clone)]
pub struct ParameterBuffer<const N: usize = MAX_PARAMETER_LENGTH> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> Default for ParameterBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for ParameterBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParameterBuffer")
            .field("len", &self.bytes.len())
            .field("capacity", &N)
            .finish()
    }
}

impl<const N: usize> ParameterBuffer<N> {
    /// The length field on the wire is 16 bits wide
    const FITS_LENGTH_FIELD: () = assert!(N <= u16::MAX as usize);

    /// Create an empty buffer
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS_LENGTH_FIELD;
        Self { bytes: Vec::new() }
    }

    /// Discard the current contents
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        N - self.bytes.len()
    }

    /// Encoded parameters
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn overflow(&self, needed: usize) -> EncodeError {
        EncodeError::CapacityExceeded {
            needed,
            remaining: self.remaining(),
        }
    }

    /// Append a fixed-width value
    ///
    /// Fails without touching the buffer if the value does not fit.
    pub fn append<T: WireValue>(&mut self, value: T) -> Result<(), EncodeError> {
        let start = self.bytes.len();
        self.bytes
            .resize(start + T::SIZE, 0)
            .map_err(|()| self.overflow(T::SIZE))?;
        value.write_to(&mut self.bytes[start..]);
        Ok(())
    }

    pub fn push_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.append(value)
    }

    pub fn push_i8(&mut self, value: i8) -> Result<(), EncodeError> {
        self.append(value)
    }

    pub fn push_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.append(value)
    }

    pub fn push_i16(&mut self, value: i16) -> Result<(), EncodeError> {
        self.append(value)
    }

    pub fn push_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.append(value)
    }

    /// Append a length-prefixed byte run
    ///
    /// Writes a 16-bit length followed by the raw bytes, no terminator.
    /// Either the whole run fits or nothing is written.
    pub fn append_bytes(&mut self, value: &[u8]) -> Result<(), EncodeError> {
        let len = u16::try_from(value.len())
            .map_err(|_| EncodeError::StringTooLong { len: value.len() })?;
        let needed = STRING_LENGTH_PREFIX + value.len();
        if needed > self.remaining() {
            return Err(self.overflow(needed));
        }

        self.append(len)?;
        self.bytes
            .extend_from_slice(value)
            .map_err(|()| self.overflow(value.len()))
    }

    /// Append a length-prefixed UTF-8 string
    pub fn append_str(&mut self, value: &str) -> Result<(), EncodeError> {
        self.append_bytes(value.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_append_advances_offset() {
        let mut buf: ParameterBuffer<16> = ParameterBuffer::new();
        buf.push_i16(10).unwrap();
        buf.push_u8(7).unwrap();
        buf.push_bool(true).unwrap();

        assert_eq!(buf.len(), 4);
        assert_eq!(buf.as_bytes(), &[10, 0, 7, 1]);
    }

    #[test]
    fn test_overflow_leaves_buffer_unchanged() {
        let mut buf: ParameterBuffer<3> = ParameterBuffer::new();
        buf.push_u16(0xBEEF).unwrap();

        let result = buf.push_u16(1);
        assert_eq!(
            result,
            Err(EncodeError::CapacityExceeded {
                needed: 2,
                remaining: 1
            })
        );
        assert_eq!(buf.as_bytes(), &[0xEF, 0xBE]);

        // A value that still fits is accepted afterwards
        buf.push_i8(-1).unwrap();
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_string_is_length_prefixed() {
        let mut buf: ParameterBuffer<16> = ParameterBuffer::new();
        buf.append_str("Hi!").unwrap();
        assert_eq!(buf.as_bytes(), &[3, 0, b'H', b'i', b'!']);
    }

    #[test]
    fn test_empty_string() {
        let mut buf: ParameterBuffer<16> = ParameterBuffer::new();
        buf.append_str("").unwrap();
        assert_eq!(buf.as_bytes(), &[0, 0]);
    }

    #[test]
    fn test_string_is_all_or_nothing() {
        let mut buf: ParameterBuffer<8> = ParameterBuffer::new();
        buf.push_u8(1).unwrap();

        // 2-byte prefix + 6 bytes = 8, only 7 remain
        let result = buf.append_str("abcdef");
        assert!(matches!(result, Err(EncodeError::CapacityExceeded { .. })));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_reset_discards_contents() {
        let mut buf: ParameterBuffer<8> = ParameterBuffer::new();
        buf.push_u16(5).unwrap();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.remaining(), 8);
    }

    #[test]
    fn test_default_capacity() {
        let buf = ParameterBuffer::<MAX_PARAMETER_LENGTH>::new();
        assert_eq!(buf.capacity(), 8192);
    }

    proptest! {
        #[test]
        fn prop_overflow_never_changes_len(fill in 0usize..32, value: u16) {
            let mut buf: ParameterBuffer<32> = ParameterBuffer::new();
            for _ in 0..fill {
                buf.push_u8(0xAA).unwrap();
            }
            let before = buf.len();
            match buf.push_u16(value) {
                Ok(()) => prop_assert_eq!(buf.len(), before + 2),
                Err(_) => {
                    prop_assert_eq!(buf.len(), before);
                    prop_assert!(before + 2 > 32);
                }
            }
        }
    }
}
