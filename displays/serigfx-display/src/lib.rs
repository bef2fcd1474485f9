//! GPU-side display components for serigfx
//!
//! This crate provides:
//! - `Canvas` trait for the drawing surface behind the video output
//! - `Dispatcher` that turns received commands into canvas calls, with
//!   swap frame pacing
//! - `GpuInterface`, the receiving endpoint polled from the render loop
//!
//! # Architecture
//!
//! ```text
//! UART ─▶ FrameReceiver ─▶ pending slot ─▶ Dispatcher ─▶ Canvas
//!              │                                │
//!              └─ resync on error               └─ swap pacing (Clock)
//! ```

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod canvas;
pub mod dispatch;
pub mod gpu;

// Re-export key types
pub use canvas::Canvas;
pub use dispatch::{
    DispatchOutcome, DispatchStats, Dispatcher, DispatcherConfig, DEFAULT_MIN_SWAP_INTERVAL_MS,
};
pub use gpu::GpuInterface;
