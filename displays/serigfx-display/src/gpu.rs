//! GPU-side link endpoint
//!
//! [`GpuInterface`] ties the frame receiver, the dispatcher, the canvas and
//! the readiness line together. The render loop calls [`GpuInterface::poll`]
//! once per iteration; each call receives at most one command and
//! dispatches it before returning.

use serigfx_hal::{wait_ready, ByteStream, Clock, LinkConfig, LinkState, OutputPin, StreamError};
use serigfx_protocol::{FrameReceiver, ReceiveError, MAX_PARAMETER_LENGTH};

use crate::canvas::Canvas;
use crate::dispatch::{DispatchOutcome, Dispatcher, DispatcherConfig};

/// Receiving end of the link, running on the GPU
pub struct GpuInterface<S, C, K, P, const N: usize = MAX_PARAMETER_LENGTH> {
    receiver: FrameReceiver<S, N>,
    dispatcher: Dispatcher<K>,
    canvas: C,
    ready: P,
    /// Result of the last `begin`; the line is only restored after a resync
    /// while this holds
    link_up: bool,
}

impl<S, C, K, P, const N: usize> GpuInterface<S, C, K, P, N>
where
    S: ByteStream,
    S::Error: StreamError,
    C: Canvas,
    K: Clock,
    P: OutputPin,
{
    /// Create an interface; the readiness line starts low
    pub fn new(stream: S, canvas: C, clock: K, ready: P) -> Self {
        Self::with_config(stream, canvas, clock, ready, DispatcherConfig::default())
    }

    pub fn with_config(
        stream: S,
        canvas: C,
        clock: K,
        mut ready: P,
        config: DispatcherConfig,
    ) -> Self {
        ready.set_low();
        Self {
            receiver: FrameReceiver::new(stream),
            dispatcher: Dispatcher::with_config(clock, config),
            canvas,
            ready,
            link_up: false,
        }
    }

    /// Start the transport, wait (bounded) for it, and raise the readiness
    /// line once it is up
    pub fn begin(&mut self, config: &LinkConfig) -> Result<LinkState, S::Error> {
        self.receiver.stream_mut().begin(config.baud)?;
        let state = wait_ready(
            self.receiver.stream(),
            self.dispatcher.clock(),
            config.ready_timeout_ms,
        );
        self.link_up = state.is_ready();
        self.ready.set_state(self.link_up);
        debug!("gpu begin at {} baud: {}", config.baud.bits_per_second(), state);
        Ok(state)
    }

    /// Receive and dispatch at most one command
    ///
    /// Returns `Ok(None)` when no complete command is available yet. On a
    /// receive error the readiness line is dropped while the stream is
    /// drained, then raised again if `begin` brought the link up.
    pub fn poll(&mut self) -> Result<Option<DispatchOutcome>, ReceiveError<S::Error>> {
        match self.receiver.try_receive() {
            Ok(true) => Ok(self.dispatcher.run(&mut self.canvas, &mut self.receiver)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("receive failed, resynchronizing: {}", e);
                self.ready.set_low();
                match self.receiver.resync() {
                    Ok(_) => self.ready.set_state(self.link_up),
                    Err(resync_err) => {
                        warn!("resync failed, staying not ready: {}", resync_err)
                    }
                }
                Err(e)
            }
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn receiver(&self) -> &FrameReceiver<S, N> {
        &self.receiver
    }

    /// Get mutable access to the underlying transport
    pub fn stream_mut(&mut self) -> &mut S {
        self.receiver.stream_mut()
    }

    pub fn dispatcher(&self) -> &Dispatcher<K> {
        &self.dispatcher
    }

    pub fn ready_pin(&self) -> &P {
        &self.ready
    }

    /// Whether the last `begin` brought the transport up
    pub fn is_link_up(&self) -> bool {
        self.link_up
    }
}
