//! Serial byte stream abstraction
//!
//! The command link only needs four things from a UART: start it, push bytes
//! out, ask how many bytes are waiting, and pull bytes in.

use crate::config::Baud;

/// Byte-oriented serial transport
///
/// Reads and writes never wait for more data than is already buffered.
/// Both return the number of bytes actually transferred, which may be less
/// than requested; the protocol layer treats a short transfer as a failed
/// frame.
pub trait ByteStream {
    /// Error type for transport operations
    type Error;

    /// Start the transport at the given baud rate
    fn begin(&mut self, baud: Baud) -> Result<(), Self::Error>;

    /// Whether the transport is up and usable
    fn is_ready(&self) -> bool;

    /// Write bytes, returning how many were accepted
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Number of received bytes that can be read without waiting
    fn available(&mut self) -> Result<usize, Self::Error>;

    /// Read up to `buf.len()` bytes, returning how many were read
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: ByteStream + ?Sized> ByteStream for &mut T {
    type Error = T::Error;

    fn begin(&mut self, baud: Baud) -> Result<(), Self::Error> {
        T::begin(self, baud)
    }

    fn is_ready(&self) -> bool {
        T::is_ready(self)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        T::write(self, data)
    }

    fn available(&mut self) -> Result<usize, Self::Error> {
        T::available(self)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_bytes(self, buf)
    }
}

/// Transport error that can be written to the log
///
/// With the `defmt` feature this also requires `defmt::Format`.
#[cfg(feature = "defmt")]
pub trait StreamError: core::fmt::Debug + defmt::Format {}

#[cfg(feature = "defmt")]
impl<T: core::fmt::Debug + defmt::Format> StreamError for T {}

/// Transport error that can be written to the log
#[cfg(not(feature = "defmt"))]
pub trait StreamError: core::fmt::Debug {}

#[cfg(not(feature = "defmt"))]
impl<T: core::fmt::Debug> StreamError for T {}
