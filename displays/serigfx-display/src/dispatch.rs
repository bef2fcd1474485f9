//! Command dispatch
//!
//! Maps received commands onto [`Canvas`] calls. Malformed or unknown
//! commands are dropped one at a time; nothing here can fail the render
//! loop.
//!
//! `swap` is paced: a swap arriving less than
//! [`DispatcherConfig::min_swap_interval_ms`] after the last performed swap
//! is skipped, so the video output is never flipped faster than it can
//! follow.

use serigfx_hal::{ByteStream, Clock};
use serigfx_protocol::{Command, CommandCode, DecodeError, FrameReceiver, Rect};

use crate::canvas::Canvas;

/// Default minimum time between two performed swaps (ms)
pub const DEFAULT_MIN_SWAP_INTERVAL_MS: u32 = 20;

/// Dispatcher configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatcherConfig {
    /// Minimum time between two performed swaps (ms)
    pub min_swap_interval_ms: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            min_swap_interval_ms: DEFAULT_MIN_SWAP_INTERVAL_MS,
        }
    }
}

/// What happened to one dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchOutcome {
    /// The canvas operation was performed
    Drawn,
    /// A swap arrived inside the pacing interval and was skipped
    Throttled,
    /// `Invalid` or `NoCommand`; nothing to do
    Ignored(CommandCode),
    /// Parameters could not be decoded; the command was dropped
    Dropped(DecodeError),
}

/// Dispatcher counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchStats {
    pub drawn: u32,
    pub throttled: u32,
    pub ignored: u32,
    pub dropped: u32,
}

/// Command dispatcher with swap pacing
pub struct Dispatcher<K> {
    clock: K,
    config: DispatcherConfig,
    last_swap_ms: Option<u64>,
    stats: DispatchStats,
}

impl<K: Clock> Dispatcher<K> {
    /// Create a dispatcher with the default configuration
    pub fn new(clock: K) -> Self {
        Self::with_config(clock, DispatcherConfig::default())
    }

    pub fn with_config(clock: K, config: DispatcherConfig) -> Self {
        Self {
            clock,
            config,
            last_swap_ms: None,
            stats: DispatchStats::default(),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Decode `params` for `code` and apply the result to `canvas`
    pub fn dispatch<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        code: CommandCode,
        params: &[u8],
    ) -> DispatchOutcome {
        let outcome = match Command::decode(code, params) {
            Ok(command) => self.apply(canvas, &command),
            Err(DecodeError::NotDispatchable(code)) => {
                debug!("ignoring {}", code);
                DispatchOutcome::Ignored(code)
            }
            Err(e) => {
                warn!("dropping command: {}", e);
                DispatchOutcome::Dropped(e)
            }
        };
        self.count(outcome);
        outcome
    }

    /// Dispatch the receiver's pending command, if any, and empty the slot
    pub fn run<S, C, const N: usize>(
        &mut self,
        canvas: &mut C,
        receiver: &mut FrameReceiver<S, N>,
    ) -> Option<DispatchOutcome>
    where
        S: ByteStream,
        C: Canvas + ?Sized,
    {
        let outcome = receiver
            .pending()
            .map(|pending| self.dispatch(canvas, pending.code, pending.params));
        receiver.release();
        outcome
    }

    fn apply<C: Canvas + ?Sized>(&mut self, canvas: &mut C, command: &Command<'_>) -> DispatchOutcome {
        match *command {
            Command::Swap => {
                let now = self.clock.now_ms();
                if !self.swap_due(now) {
                    trace!("swap throttled");
                    return DispatchOutcome::Throttled;
                }
                canvas.swap();
                self.last_swap_ms = Some(now);
            }
            Command::FillScreen { color } => canvas.fill_screen(color),
            Command::FillRect(Rect { x, y, w, h, color }) => canvas.fill_rect(x, y, w, h, color),
            Command::DrawRect(Rect { x, y, w, h, color }) => canvas.draw_rect(x, y, w, h, color),
            Command::SetFont { font } => canvas.set_font(font),
            Command::SetTextSize { size } => canvas.set_text_size(size),
            Command::SetTextColor { color } => canvas.set_text_color(color),
            Command::SetCursor { x, y } => canvas.set_cursor(x, y),
            Command::Print { text } => canvas.print(text),
            Command::Println { text } => canvas.println(text),
        }
        DispatchOutcome::Drawn
    }

    fn swap_due(&self, now: u64) -> bool {
        match self.last_swap_ms {
            Some(last) => now.saturating_sub(last) >= u64::from(self.config.min_swap_interval_ms),
            None => true,
        }
    }

    fn count(&mut self, outcome: DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::Drawn => &mut self.stats.drawn,
            DispatchOutcome::Throttled => &mut self.stats.throttled,
            DispatchOutcome::Ignored(_) => &mut self.stats.ignored,
            DispatchOutcome::Dropped(_) => &mut self.stats.dropped,
        };
        *counter = counter.wrapping_add(1);
    }
}
