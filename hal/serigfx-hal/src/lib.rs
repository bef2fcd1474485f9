//! serigfx Hardware Abstraction Layer
//!
//! Everything the command link needs from the board, expressed as traits so
//! the protocol and the display dispatcher can run on any MCU (and on the
//! host, under test).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐          ┌──────────────────────┐
//! │  CPU: GpuLink        │          │  GPU: GpuInterface   │
//! └──────────────────────┘          └──────────────────────┘
//!            │                                 │
//!            ▼                                 ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  serigfx-hal (this crate - traits)                      │
//! │  ByteStream · InputPin/OutputPin · Clock                │
//! └─────────────────────────────────────────────────────────┘
//!            │                                 │
//!            ▼                                 ▼
//!   embedded-io UART (IoStream)     embedded-hal pins (HalPin)
//! ```
//!
//! # Traits
//!
//! - [`stream::ByteStream`] - Serial byte transport
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Readiness signalling
//! - [`clock::Clock`] - Monotonic millisecond time source

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod gpio;
pub mod io;
pub mod ready;
pub mod stream;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use config::{Baud, LinkConfig};
pub use gpio::{HalPin, InputPin, OutputPin};
pub use io::IoStream;
pub use ready::{poll_ready, wait_ready, LinkState};
pub use stream::{ByteStream, StreamError};
