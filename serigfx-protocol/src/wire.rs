//! Wire format shared by both ends of the link.
//!
//! Frame format:
//! - CODE (2 bytes): command code, little-endian `u16`
//! - LENGTH (2 bytes): parameter length in bytes, little-endian `u16`
//! - PARAMETERS (0..=MAX_PARAMETER_LENGTH bytes): command-specific layout
//!
//! Every multi-byte value is little-endian regardless of host byte order.

/// Header size in bytes (CODE + LENGTH)
pub const HEADER_SIZE: usize = 4;

/// Maximum parameter payload per frame
pub const MAX_PARAMETER_LENGTH: usize = 8192;

/// Size of the length prefix in front of string parameters
pub const STRING_LENGTH_PREFIX: usize = 2;

/// Command codes
///
/// `Invalid` is what unknown wire values decode to; `NoCommand` marks an
/// empty pending-command slot on the receiver. Neither is ever dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum CommandCode {
    Invalid = 0,
    NoCommand = 1,
    Swap = 2,
    FillScreen = 3,
    FillRect = 4,
    DrawRect = 5,
    SetFont = 6,
    SetTextSize = 7,
    SetTextColor = 8,
    SetCursor = 9,
    Print = 10,
    Println = 11,
}

impl CommandCode {
    /// Every code that carries a draw call
    pub const DISPATCHABLE: [CommandCode; 10] = [
        CommandCode::Swap,
        CommandCode::FillScreen,
        CommandCode::FillRect,
        CommandCode::DrawRect,
        CommandCode::SetFont,
        CommandCode::SetTextSize,
        CommandCode::SetTextColor,
        CommandCode::SetCursor,
        CommandCode::Print,
        CommandCode::Println,
    ];

    /// Decode a wire value; anything unknown becomes `Invalid`
    pub fn from_wire(value: u16) -> Self {
        match value {
            1 => CommandCode::NoCommand,
            2 => CommandCode::Swap,
            3 => CommandCode::FillScreen,
            4 => CommandCode::FillRect,
            5 => CommandCode::DrawRect,
            6 => CommandCode::SetFont,
            7 => CommandCode::SetTextSize,
            8 => CommandCode::SetTextColor,
            9 => CommandCode::SetCursor,
            10 => CommandCode::Print,
            11 => CommandCode::Println,
            _ => CommandCode::Invalid,
        }
    }

    /// Wire value
    pub const fn to_wire(self) -> u16 {
        self as u16
    }

    /// Returns true for codes that map to a canvas operation
    pub const fn is_dispatchable(self) -> bool {
        !matches!(self, CommandCode::Invalid | CommandCode::NoCommand)
    }
}

/// Part of a frame a transfer belonged to, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameStage {
    Code,
    Length,
    Parameters,
}

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameHeader {
    /// Command code (unknown values already mapped to `Invalid`)
    pub code: CommandCode,
    /// Number of parameter bytes following the header
    pub param_len: u16,
}

impl FrameHeader {
    pub const fn new(code: CommandCode, param_len: u16) -> Self {
        Self { code, param_len }
    }

    /// Encode to the 4 header bytes
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let code = self.code.to_wire().to_le_bytes();
        let len = self.param_len.to_le_bytes();
        [code[0], code[1], len[0], len[1]]
    }

    /// Decode from the 4 header bytes
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            code: CommandCode::from_wire(u16::from_le_bytes([bytes[0], bytes[1]])),
            param_len: u16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }
}

/// A fixed-width value that can travel as a command parameter
pub trait WireValue: Sized + Copy {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Write `Self::SIZE` bytes to the front of `out`
    ///
    /// Callers guarantee `out.len() >= Self::SIZE`.
    fn write_to(self, out: &mut [u8]);

    /// Read from the front of `bytes`, or `None` if it is too short
    fn read_from(bytes: &[u8]) -> Option<Self>;
}

impl WireValue for bool {
    const SIZE: usize = 1;

    fn write_to(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        bytes.first().map(|&b| b != 0)
    }
}

macro_rules! impl_wire_int {
    ($($ty:ty),*) => {
        $(
            impl WireValue for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn write_to(self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }

                fn read_from(bytes: &[u8]) -> Option<Self> {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes.get(..Self::SIZE)?);
                    Some(<$ty>::from_le_bytes(raw))
                }
            }
        )*
    };
}

impl_wire_int!(i8, u8, i16, u16, i32, u32);
