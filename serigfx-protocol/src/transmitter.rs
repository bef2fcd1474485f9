//! Frame transmission
//!
//! One call sends one frame: code, length, then the parameter bytes. A short
//! write at any step abandons the frame; nothing is retried.

use serigfx_hal::ByteStream;

use crate::wire::{CommandCode, FrameHeader, FrameStage, MAX_PARAMETER_LENGTH};

/// Errors that can occur while sending a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError<E> {
    /// Transport reported an error
    Stream(E),
    /// Transport accepted fewer bytes than the frame needed
    ShortWrite {
        stage: FrameStage,
        expected: usize,
        written: usize,
    },
    /// Parameters exceed the protocol maximum
    PayloadTooLarge { len: usize },
    /// `Invalid` and `NoCommand` are never put on the wire
    NotSendable(CommandCode),
}

impl<E: core::fmt::Debug> core::fmt::Display for SendError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SendError::Stream(e) => write!(f, "transport error: {e:?}"),
            SendError::ShortWrite {
                stage,
                expected,
                written,
            } => write!(f, "short write in {stage:?}: {written} of {expected} bytes"),
            SendError::PayloadTooLarge { len } => {
                write!(f, "{len} parameter bytes exceed {MAX_PARAMETER_LENGTH}")
            }
            SendError::NotSendable(code) => write!(f, "{code:?} cannot be sent"),
        }
    }
}

/// Sending half of the link
pub struct FrameTransmitter<S> {
    stream: S,
    frames_sent: u32,
}

impl<S: ByteStream> FrameTransmitter<S> {
    /// Create a transmitter over a transport
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            frames_sent: 0,
        }
    }

    /// Get access to the underlying transport
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Get mutable access to the underlying transport
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Unwrap the underlying transport
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Number of frames sent completely
    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    /// Send one frame
    pub fn send(&mut self, code: CommandCode, params: &[u8]) -> Result<(), SendError<S::Error>> {
        if !code.is_dispatchable() {
            return Err(SendError::NotSendable(code));
        }
        let param_len = match u16::try_from(params.len()) {
            Ok(len) if params.len() <= MAX_PARAMETER_LENGTH => len,
            _ => return Err(SendError::PayloadTooLarge { len: params.len() }),
        };

        let header = FrameHeader::new(code, param_len).encode();
        self.write_exact(FrameStage::Code, &header[..2])?;
        self.write_exact(FrameStage::Length, &header[2..])?;
        if !params.is_empty() {
            self.write_exact(FrameStage::Parameters, params)?;
        }

        self.frames_sent = self.frames_sent.wrapping_add(1);
        trace!("sent {} with {} parameter bytes", code, param_len);
        Ok(())
    }

    fn write_exact(&mut self, stage: FrameStage, bytes: &[u8]) -> Result<(), SendError<S::Error>> {
        let written = self.stream.write(bytes).map_err(SendError::Stream)?;
        if written != bytes.len() {
            warn!("short write in {}: {} of {}", stage, written, bytes.len());
            return Err(SendError::ShortWrite {
                stage,
                expected: bytes.len(),
                written,
            });
        }
        Ok(())
    }
}
