//! `embedded-io` transport adapter
//!
//! `embedded-io` can say whether a read would block but not how many bytes
//! are waiting. [`IoStream`] stages incoming bytes in a fixed ring so that
//! [`ByteStream::available`] is exact.

use embedded_io::{Read, ReadReady, Write};
use heapless::Deque;

use crate::config::Baud;
use crate::stream::ByteStream;

/// Chunk size used when draining the underlying reader
const PULL_CHUNK: usize = 32;

/// [`ByteStream`] over any blocking `embedded-io` UART
///
/// `N` bounds how many received bytes are staged at once. The UART itself
/// is configured by the board HAL when it is constructed, so [`begin`]
/// only records the requested rate and marks the stream ready.
///
/// [`begin`]: ByteStream::begin
pub struct IoStream<T, const N: usize> {
    inner: T,
    rx: Deque<u8, N>,
    baud: Option<Baud>,
}

impl<T, const N: usize> IoStream<T, N> {
    /// Wrap an `embedded-io` transport
    pub const fn new(inner: T) -> Self {
        Self {
            inner,
            rx: Deque::new(),
            baud: None,
        }
    }

    /// Baud rate passed to `begin`, if started
    pub fn baud(&self) -> Option<Baud> {
        self.baud
    }

    /// Number of staged bytes
    pub fn staged(&self) -> usize {
        self.rx.len()
    }

    /// Get access to the underlying transport
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Get mutable access to the underlying transport
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the underlying transport, dropping staged bytes
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + ReadReady, const N: usize> IoStream<T, N> {
    /// Move every byte the transport can deliver without blocking into the
    /// staging ring, until the ring is full
    fn pull(&mut self) -> Result<(), T::Error> {
        let mut chunk = [0u8; PULL_CHUNK];
        while !self.rx.is_full() && self.inner.read_ready()? {
            let space = (N - self.rx.len()).min(PULL_CHUNK);
            let n = self.inner.read(&mut chunk[..space])?;
            if n == 0 {
                break;
            }
            for &byte in &chunk[..n] {
                // Cannot fail: `space` bounds the read to the free slots
                let _ = self.rx.push_back(byte);
            }
        }
        Ok(())
    }
}

impl<T, const N: usize> ByteStream for IoStream<T, N>
where
    T: Read + ReadReady + Write,
{
    type Error = T::Error;

    fn begin(&mut self, baud: Baud) -> Result<(), Self::Error> {
        self.rx.clear();
        self.baud = Some(baud);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.baud.is_some()
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let mut written = 0;
        while written < data.len() {
            let n = self.inner.write(&data[written..])?;
            if n == 0 {
                break;
            }
            written += n;
        }
        Ok(written)
    }

    fn available(&mut self) -> Result<usize, Self::Error> {
        self.pull()?;
        Ok(self.rx.len())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.rx.len() < buf.len() {
            self.pull()?;
        }
        let mut read = 0;
        for slot in buf.iter_mut() {
            match self.rx.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    read += 1;
                }
                None => break,
            }
        }
        Ok(read)
    }
}
