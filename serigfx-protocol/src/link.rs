//! CPU-side command sender
//!
//! [`GpuLink`] owns the parameter buffer and the transmitter. Every `send_*`
//! call resets the buffer, encodes that command's parameters and transmits
//! one frame before returning.

use serigfx_hal::{wait_ready, ByteStream, Clock, InputPin, LinkConfig, LinkState};

use crate::command::{Command, Rect};
use crate::encoder::{EncodeError, ParameterBuffer};
use crate::transmitter::{FrameTransmitter, SendError};
use crate::wire::MAX_PARAMETER_LENGTH;

/// Errors that can occur while sending a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Parameters did not fit the buffer; nothing was sent
    Encode(EncodeError),
    /// Frame could not be written completely
    Send(SendError<E>),
}

impl<E> From<EncodeError> for LinkError<E> {
    fn from(e: EncodeError) -> Self {
        LinkError::Encode(e)
    }
}

impl<E> From<SendError<E>> for LinkError<E> {
    fn from(e: SendError<E>) -> Self {
        LinkError::Send(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinkError::Encode(e) => write!(f, "encode failed: {e}"),
            LinkError::Send(e) => write!(f, "send failed: {e}"),
        }
    }
}

/// Sending end of the link, running on the CPU
///
/// `R` is the GPU's readiness line.
pub struct GpuLink<S, R, const N: usize = MAX_PARAMETER_LENGTH> {
    tx: FrameTransmitter<S>,
    params: ParameterBuffer<N>,
    ready: R,
}

impl<S: ByteStream, R: InputPin, const N: usize> GpuLink<S, R, N> {
    /// Create a sender over a transport and readiness input
    pub fn new(stream: S, ready: R) -> Self {
        Self {
            tx: FrameTransmitter::new(stream),
            params: ParameterBuffer::new(),
            ready,
        }
    }

    /// Start the transport and wait (bounded) for it to come up
    pub fn begin<K: Clock + ?Sized>(
        &mut self,
        config: &LinkConfig,
        clock: &K,
    ) -> Result<LinkState, S::Error> {
        self.tx.stream_mut().begin(config.baud)?;
        let state = wait_ready(self.tx.stream(), clock, config.ready_timeout_ms);
        debug!("link begin at {} baud: {}", config.baud.bits_per_second(), state);
        Ok(state)
    }

    /// Whether the GPU signals that it is accepting commands
    pub fn is_gpu_ready(&mut self) -> bool {
        self.ready.is_high()
    }

    /// Get access to the transmitter
    pub fn transmitter(&self) -> &FrameTransmitter<S> {
        &self.tx
    }

    /// Get mutable access to the underlying transport
    pub fn stream_mut(&mut self) -> &mut S {
        self.tx.stream_mut()
    }

    /// Release the transport and readiness pin
    pub fn into_parts(self) -> (S, R) {
        (self.tx.into_inner(), self.ready)
    }

    /// Encode and send one command
    pub fn send(&mut self, command: &Command<'_>) -> Result<(), LinkError<S::Error>> {
        command.encode(&mut self.params)?;
        self.tx.send(command.code(), self.params.as_bytes())?;
        Ok(())
    }

    pub fn send_swap(&mut self) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::Swap)
    }

    pub fn send_fill_screen(&mut self, color: u16) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::FillScreen { color })
    }

    pub fn send_fill_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: u16,
    ) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::FillRect(Rect::new(x, y, w, h, color)))
    }

    pub fn send_draw_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: u16,
    ) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::DrawRect(Rect::new(x, y, w, h, color)))
    }

    pub fn send_set_font(&mut self, font: u8) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::SetFont { font })
    }

    pub fn send_set_text_size(&mut self, size: u8) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::SetTextSize { size })
    }

    pub fn send_set_text_color(&mut self, color: u16) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::SetTextColor { color })
    }

    pub fn send_set_cursor(&mut self, x: i16, y: i16) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::SetCursor { x, y })
    }

    pub fn send_print(&mut self, text: &str) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::Print { text })
    }

    pub fn send_println(&mut self, text: &str) -> Result<(), LinkError<S::Error>> {
        self.send(&Command::Println { text })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::wire::FrameStage;
    use serigfx_hal::Baud;
    use std::vec::Vec;

    struct WireLog {
        bytes: Vec<u8>,
        started_at: Option<Baud>,
        accept: usize,
    }

    impl WireLog {
        fn new() -> Self {
            Self {
                bytes: Vec::new(),
                started_at: None,
                accept: usize::MAX,
            }
        }
    }

    impl ByteStream for WireLog {
        type Error = ();

        fn begin(&mut self, baud: Baud) -> Result<(), ()> {
            self.started_at = Some(baud);
            Ok(())
        }

        fn is_ready(&self) -> bool {
            self.started_at.is_some()
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            let n = data.len().min(self.accept);
            self.accept -= n;
            self.bytes.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn available(&mut self) -> Result<usize, ()> {
            Ok(0)
        }

        fn read_bytes(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
            Ok(0)
        }
    }

    struct ReadyLine(bool);

    impl InputPin for ReadyLine {
        fn is_high(&mut self) -> bool {
            self.0
        }
    }

    struct ZeroClock;

    impl Clock for ZeroClock {
        fn now_ms(&self) -> u64 {
            0
        }
    }

    fn link() -> GpuLink<WireLog, ReadyLine, 64> {
        GpuLink::new(WireLog::new(), ReadyLine(true))
    }

    #[test]
    fn test_begin_starts_stream() {
        let mut link = link();
        let state = link
            .begin(&LinkConfig::with_baud(Baud::Half), &ZeroClock)
            .unwrap();
        assert_eq!(state, LinkState::Ready);
        assert_eq!(link.stream_mut().started_at, Some(Baud::Half));
    }

    #[test]
    fn test_gpu_ready_line() {
        let mut link = GpuLink::<_, _, 64>::new(WireLog::new(), ReadyLine(false));
        assert!(!link.is_gpu_ready());
    }

    #[test]
    fn test_fill_rect_frame() {
        let mut link = link();
        link.send_fill_rect(10, 20, 100, 50, 0x1F).unwrap();

        let (stream, _) = link.into_parts();
        assert_eq!(
            stream.bytes,
            [4, 0, 10, 0, 10, 0, 20, 0, 100, 0, 50, 0, 0x1F, 0]
        );
    }

    #[test]
    fn test_consecutive_commands_do_not_bleed() {
        let mut link = link();
        link.send_set_cursor(1, 2).unwrap();
        link.send_swap().unwrap();
        link.send_set_text_size(3).unwrap();

        let (stream, _) = link.into_parts();
        assert_eq!(
            stream.bytes,
            [9, 0, 4, 0, 1, 0, 2, 0, 2, 0, 0, 0, 7, 0, 1, 0, 3]
        );
    }

    #[test]
    fn test_print_is_length_prefixed() {
        let mut link = link();
        link.send_println("Hi").unwrap();

        let (stream, _) = link.into_parts();
        assert_eq!(stream.bytes, [11, 0, 4, 0, 2, 0, b'H', b'i']);
    }

    #[test]
    fn test_text_too_long_is_not_sent() {
        let mut link = link();
        let text = "x".repeat(63);

        let result = link.send_print(&text);
        assert!(matches!(
            result,
            Err(LinkError::Encode(EncodeError::CapacityExceeded { .. }))
        ));
        assert_eq!(link.transmitter().frames_sent(), 0);
        assert!(link.stream_mut().bytes.is_empty());
    }

    #[test]
    fn test_short_write_reported() {
        let mut link = link();
        link.stream_mut().accept = 5;

        let result = link.send_fill_screen(0xFFFF);
        assert_eq!(
            result,
            Err(LinkError::Send(SendError::ShortWrite {
                stage: FrameStage::Parameters,
                expected: 2,
                written: 1
            }))
        );
    }
}
