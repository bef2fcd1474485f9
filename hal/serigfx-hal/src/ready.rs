//! Startup readiness check
//!
//! Waiting for the transport is bounded: the caller passes a timeout and gets
//! back a distinct `TimedOut` result instead of spinning forever.

use crate::clock::Clock;
use crate::stream::ByteStream;

/// Outcome of a readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Transport is up
    Ready,
    /// Transport is not up yet (single probe)
    NotReady,
    /// Transport did not come up before the deadline
    TimedOut,
}

impl LinkState {
    /// Returns true if the transport is usable
    pub fn is_ready(self) -> bool {
        self == LinkState::Ready
    }
}

/// Probe the transport once
pub fn poll_ready<S: ByteStream + ?Sized>(stream: &S) -> LinkState {
    if stream.is_ready() {
        LinkState::Ready
    } else {
        LinkState::NotReady
    }
}

/// Poll the transport until it is ready or `timeout_ms` has elapsed
///
/// A zero timeout is a single probe and reports `NotReady` on failure.
pub fn wait_ready<S, K>(stream: &S, clock: &K, timeout_ms: u32) -> LinkState
where
    S: ByteStream + ?Sized,
    K: Clock + ?Sized,
{
    if timeout_ms == 0 {
        return poll_ready(stream);
    }

    let start = clock.now_ms();
    loop {
        if stream.is_ready() {
            return LinkState::Ready;
        }
        if clock.elapsed_ms(start) >= u64::from(timeout_ms) {
            return LinkState::TimedOut;
        }
    }
}
