//! Frame reception
//!
//! The receiver holds at most one fully received command (the pending slot).
//! While that slot is occupied it does not touch the transport, so the only
//! backpressure is whatever buffering the transport itself provides.
//!
//! ```text
//!            available >= 4            all parameter bytes read
//!   Idle ───────────────────▶ Header ─────────────────────────▶ Occupied
//!    ▲         (read code + len)   │                                │
//!    │                             │ short read / oversize          │
//!    ├─────────────────────────────┘                                │
//!    └──────────────────────────────────────────────────────────────┘
//!                              release()
//! ```
//!
//! Reads never wait for bytes that have not arrived yet: parameter bytes are
//! collected across as many polls as it takes.

use serigfx_hal::ByteStream;

use crate::command::{Command, DecodeError};
use crate::decoder::ParamReader;
use crate::wire::{CommandCode, FrameHeader, FrameStage, HEADER_SIZE, MAX_PARAMETER_LENGTH};

/// Chunk size used when discarding bytes during resync
const DISCARD_CHUNK: usize = 32;

/// Errors that can occur while receiving a frame
///
/// After any of these the receiver is back to `Idle`, the pending slot is
/// empty and the stream position is wherever the failed read left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveError<E> {
    /// Transport reported an error
    Stream(E),
    /// Transport returned fewer bytes than it reported available
    ShortRead {
        stage: FrameStage,
        expected: usize,
        read: usize,
    },
    /// Header announced more parameter bytes than the buffer holds
    PayloadTooLarge { len: u16, capacity: usize },
}

impl<E: core::fmt::Debug> core::fmt::Display for ReceiveError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReceiveError::Stream(e) => write!(f, "transport error: {e:?}"),
            ReceiveError::ShortRead {
                stage,
                expected,
                read,
            } => write!(f, "short read in {stage:?}: {read} of {expected} bytes"),
            ReceiveError::PayloadTooLarge { len, capacity } => {
                write!(f, "frame announces {len} parameter bytes, capacity is {capacity}")
            }
        }
    }
}

/// Observable receiver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiverState {
    /// Pending slot empty, waiting for a header
    Idle,
    /// Header read, collecting parameter bytes
    HeaderPending,
    /// A command is waiting to be dispatched
    Occupied,
}

#[derive(Debug, Clone, Copy)]
enum RxState {
    Idle,
    Header { header: FrameHeader, received: usize },
    Occupied(FrameHeader),
}

/// Receiver counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiverStats {
    /// Frames received completely
    pub frames_received: u32,
    /// Receive attempts abandoned on a short read
    pub short_reads: u32,
    /// Headers rejected for announcing too many parameter bytes
    pub oversize_frames: u32,
    /// Bytes dropped by `resync`
    pub bytes_discarded: u32,
}

/// A received command waiting in the pending slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCommand<'a> {
    /// Command code (`Invalid` for unknown wire values)
    pub code: CommandCode,
    /// Raw parameter bytes
    pub params: &'a [u8],
}

impl<'a> PendingCommand<'a> {
    /// Cursor over the parameters
    pub fn reader(&self) -> ParamReader<'a> {
        ParamReader::new(self.params)
    }

    /// Decode into a typed command
    pub fn decode(&self) -> Result<Command<'a>, DecodeError> {
        Command::decode(self.code, self.params)
    }
}

/// Receiving half of the link
pub struct FrameReceiver<S, const N: usize = MAX_PARAMETER_LENGTH> {
    stream: S,
    header: [u8; HEADER_SIZE],
    params: [u8; N],
    state: RxState,
    desynchronized: bool,
    stats: ReceiverStats,
}

impl<S: ByteStream, const N: usize> FrameReceiver<S, N> {
    /// Create a receiver over a transport
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            header: [0; HEADER_SIZE],
            params: [0; N],
            state: RxState::Idle,
            desynchronized: false,
            stats: ReceiverStats::default(),
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

    pub fn state(&self) -> ReceiverState {
        match self.state {
            RxState::Idle => ReceiverState::Idle,
            RxState::Header { .. } => ReceiverState::HeaderPending,
            RxState::Occupied(_) => ReceiverState::Occupied,
        }
    }

    /// Code in the pending slot (`NoCommand` when empty)
    pub fn pending_code(&self) -> CommandCode {
        match self.state {
            RxState::Occupied(header) => header.code,
            _ => CommandCode::NoCommand,
        }
    }

    /// True after a failed receive left the stream mid-frame, until `resync`
    pub fn is_desynchronized(&self) -> bool {
        self.desynchronized
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Parameter capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Try to complete one frame from the bytes already available
    ///
    /// Returns `Ok(true)` when a command landed in the pending slot and
    /// `Ok(false)` when the slot is occupied or more bytes are needed.
    pub fn try_receive(&mut self) -> Result<bool, ReceiveError<S::Error>> {
        let (header, received) = match self.state {
            RxState::Occupied(_) => return Ok(false),
            RxState::Header { header, received } => (header, received),
            RxState::Idle => match self.read_header()? {
                Some(header) => (header, 0),
                None => return Ok(false),
            },
        };

        self.read_params(header, received)
    }

    /// The command in the pending slot, if any
    pub fn pending(&self) -> Option<PendingCommand<'_>> {
        match self.state {
            RxState::Occupied(header) => Some(PendingCommand {
                code: header.code,
                params: &self.params[..usize::from(header.param_len)],
            }),
            _ => None,
        }
    }

    /// Empty the pending slot
    pub fn release(&mut self) {
        if let RxState::Occupied(_) = self.state {
            self.state = RxState::Idle;
        }
    }

    /// Drop every byte currently available and any partially read frame
    ///
    /// A complete command in the pending slot is kept. Returns the number of
    /// bytes discarded from the transport.
    pub fn resync(&mut self) -> Result<usize, ReceiveError<S::Error>> {
        if let RxState::Header { .. } = self.state {
            self.state = RxState::Idle;
        }

        let mut to_discard = self.stream.available().map_err(ReceiveError::Stream)?;
        let mut discarded = 0;
        let mut scratch = [0u8; DISCARD_CHUNK];
        while to_discard > 0 {
            let chunk = to_discard.min(DISCARD_CHUNK);
            let n = self
                .stream
                .read_bytes(&mut scratch[..chunk])
                .map_err(ReceiveError::Stream)?;
            if n == 0 {
                break;
            }
            discarded += n;
            to_discard -= n.min(to_discard);
        }

        self.desynchronized = false;
        self.stats.bytes_discarded = self
            .stats
            .bytes_discarded
            .saturating_add(u32::try_from(discarded).unwrap_or(u32::MAX));
        debug!("resync discarded {} bytes", discarded);
        Ok(discarded)
    }

    fn read_header(&mut self) -> Result<Option<FrameHeader>, ReceiveError<S::Error>> {
        let available = self.stream.available().map_err(ReceiveError::Stream)?;
        if available < HEADER_SIZE {
            return Ok(None);
        }

        self.read_exact_into_header(FrameStage::Code, 0)?;
        self.read_exact_into_header(FrameStage::Length, 2)?;
        let header = FrameHeader::decode(&self.header);

        if usize::from(header.param_len) > N {
            warn!("frame announces {} parameter bytes, capacity {}", header.param_len, N);
            self.stats.oversize_frames = self.stats.oversize_frames.saturating_add(1);
            self.desynchronized = true;
            return Err(ReceiveError::PayloadTooLarge {
                len: header.param_len,
                capacity: N,
            });
        }

        if header.code == CommandCode::Invalid {
            debug!(
                "unknown command code {=u16:#x}",
                u16::from_le_bytes([self.header[0], self.header[1]])
            );
        }

        self.state = RxState::Header {
            header,
            received: 0,
        };
        Ok(Some(header))
    }

    fn read_exact_into_header(
        &mut self,
        stage: FrameStage,
        offset: usize,
    ) -> Result<(), ReceiveError<S::Error>> {
        let result = self.stream.read_bytes(&mut self.header[offset..offset + 2]);
        self.check_read(stage, 2, result)
    }

    fn read_params(
        &mut self,
        header: FrameHeader,
        mut received: usize,
    ) -> Result<bool, ReceiveError<S::Error>> {
        let total = usize::from(header.param_len);

        if received < total {
            let available = match self.stream.available() {
                Ok(n) => n,
                Err(e) => return Err(self.abandon(ReceiveError::Stream(e))),
            };
            let wanted = available.min(total - received);
            if wanted > 0 {
                let result = self
                    .stream
                    .read_bytes(&mut self.params[received..received + wanted]);
                self.check_read(FrameStage::Parameters, wanted, result)?;
                received += wanted;
            }
        }

        if received < total {
            trace!("waiting for parameters: {} of {}", received, total);
            self.state = RxState::Header { header, received };
            return Ok(false);
        }

        if header.code == CommandCode::NoCommand {
            // The slot reads empty exactly when it holds `NoCommand`
            trace!("discarding noCommand frame");
            self.state = RxState::Idle;
            return Ok(false);
        }

        self.state = RxState::Occupied(header);
        self.stats.frames_received = self.stats.frames_received.wrapping_add(1);
        trace!("received {} with {} parameter bytes", header.code, header.param_len);
        Ok(true)
    }

    fn check_read(
        &mut self,
        stage: FrameStage,
        expected: usize,
        result: Result<usize, S::Error>,
    ) -> Result<(), ReceiveError<S::Error>> {
        match result {
            Ok(read) if read == expected => Ok(()),
            Ok(read) => {
                warn!("short read in {}: {} of {}", stage, read, expected);
                self.stats.short_reads = self.stats.short_reads.saturating_add(1);
                Err(self.abandon(ReceiveError::ShortRead {
                    stage,
                    expected,
                    read,
                }))
            }
            Err(e) => Err(self.abandon(ReceiveError::Stream(e))),
        }
    }

    /// Drop the frame in progress and flag the stream as mid-frame
    fn abandon(&mut self, error: ReceiveError<S::Error>) -> ReceiveError<S::Error> {
        self.state = RxState::Idle;
        self.desynchronized = true;
        error
    }
}
