//! serigfx command protocol
//!
//! This crate defines the UART protocol between the CPU (application MCU)
//! and the GPU (display MCU). The CPU serializes draw calls into frames; the
//! GPU receives them one at a time and hands them to its canvas.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────────┬──────────┬──────────────────────┐
//! │ CODE     │ LENGTH   │ PARAMETERS           │
//! │ u16 LE   │ u16 LE   │ 0–8192B              │
//! └──────────┴──────────┴──────────────────────┘
//! ```
//!
//! There is no sync byte and no checksum. The receiver keeps at most one
//! undispatched command and stops reading while it holds one.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod command;
pub mod decoder;
pub mod encoder;
pub mod link;
pub mod receiver;
pub mod transmitter;
pub mod wire;

pub use command::{Command, DecodeError, Rect};
pub use decoder::ParamReader;
pub use encoder::{EncodeError, ParameterBuffer};
pub use link::{GpuLink, LinkError};
pub use receiver::{FrameReceiver, PendingCommand, ReceiveError, ReceiverState, ReceiverStats};
pub use transmitter::{FrameTransmitter, SendError};
pub use wire::{
    CommandCode, FrameHeader, FrameStage, WireValue, HEADER_SIZE, MAX_PARAMETER_LENGTH,
};
