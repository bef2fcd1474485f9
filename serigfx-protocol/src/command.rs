//! Typed draw commands
//!
//! One variant per dispatchable [`CommandCode`], each knowing its own
//! parameter layout:
//!
//! | Command | Parameters |
//! |---|---|
//! | `Swap` | none |
//! | `FillScreen` | color:u16 |
//! | `FillRect` / `DrawRect` | x:i16, y:i16, w:i16, h:i16, color:u16 |
//! | `SetFont` | font:u8 |
//! | `SetTextSize` | size:u8 |
//! | `SetTextColor` | color:u16 |
//! | `SetCursor` | x:i16, y:i16 |
//! | `Print` / `Println` | len:u16, then `len` UTF-8 bytes |

use crate::decoder::ParamReader;
use crate::encoder::{EncodeError, ParameterBuffer};
use crate::wire::CommandCode;

/// Errors that can occur while decoding a received command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// `Invalid` or `NoCommand`, never dispatched
    NotDispatchable(CommandCode),
    /// Payload shorter than the command's layout
    Truncated(CommandCode),
    /// Text payload is not valid UTF-8
    InvalidText(CommandCode),
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::NotDispatchable(code) => write!(f, "{code:?} is not dispatchable"),
            DecodeError::Truncated(code) => write!(f, "{code:?} parameters truncated"),
            DecodeError::InvalidText(code) => write!(f, "{code:?} text is not UTF-8"),
        }
    }
}

/// Rectangle parameters shared by `FillRect` and `DrawRect`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub w: i16,
    pub h: i16,
    pub color: u16,
}

impl Rect {
    pub const fn new(x: i16, y: i16, w: i16, h: i16, color: u16) -> Self {
        Self { x, y, w, h, color }
    }

    fn encode<const N: usize>(&self, buf: &mut ParameterBuffer<N>) -> Result<(), EncodeError> {
        buf.push_i16(self.x)?;
        buf.push_i16(self.y)?;
        buf.push_i16(self.w)?;
        buf.push_i16(self.h)?;
        buf.push_u16(self.color)
    }

    fn decode(reader: &mut ParamReader<'_>) -> Option<Self> {
        reader.reset();
        Some(Self {
            x: reader.next()?,
            y: reader.next()?,
            w: reader.next()?,
            h: reader.next()?,
            color: reader.next()?,
        })
    }
}

/// A draw command with its decoded parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Present the back buffer
    Swap,
    /// Fill the whole canvas
    FillScreen { color: u16 },
    /// Filled rectangle
    FillRect(Rect),
    /// Rectangle outline
    DrawRect(Rect),
    /// Select a font by id
    SetFont { font: u8 },
    /// Text scale factor
    SetTextSize { size: u8 },
    /// Text foreground color
    SetTextColor { color: u16 },
    /// Move the text cursor
    SetCursor { x: i16, y: i16 },
    /// Print text at the cursor
    Print { text: &'a str },
    /// Print text followed by a line break
    Println { text: &'a str },
}

impl<'a> Command<'a> {
    /// Wire code for this command
    pub const fn code(&self) -> CommandCode {
        match self {
            Command::Swap => CommandCode::Swap,
            Command::FillScreen { .. } => CommandCode::FillScreen,
            Command::FillRect(_) => CommandCode::FillRect,
            Command::DrawRect(_) => CommandCode::DrawRect,
            Command::SetFont { .. } => CommandCode::SetFont,
            Command::SetTextSize { .. } => CommandCode::SetTextSize,
            Command::SetTextColor { .. } => CommandCode::SetTextColor,
            Command::SetCursor { .. } => CommandCode::SetCursor,
            Command::Print { .. } => CommandCode::Print,
            Command::Println { .. } => CommandCode::Println,
        }
    }

    /// Reset `buf` and encode this command's parameters into it
    pub fn encode<const N: usize>(&self, buf: &mut ParameterBuffer<N>) -> Result<(), EncodeError> {
        buf.reset();
        match self {
            Command::Swap => Ok(()),
            Command::FillScreen { color } | Command::SetTextColor { color } => buf.push_u16(*color),
            Command::FillRect(rect) | Command::DrawRect(rect) => rect.encode(buf),
            Command::SetFont { font } => buf.push_u8(*font),
            Command::SetTextSize { size } => buf.push_u8(*size),
            Command::SetCursor { x, y } => {
                buf.push_i16(*x)?;
                buf.push_i16(*y)
            }
            Command::Print { text } | Command::Println { text } => buf.append_str(text),
        }
    }

    /// Decode the parameters received for `code`
    ///
    /// Trailing bytes beyond a command's layout are ignored.
    pub fn decode(code: CommandCode, params: &'a [u8]) -> Result<Self, DecodeError> {
        let mut reader = ParamReader::new(params);
        let truncated = DecodeError::Truncated(code);

        let command = match code {
            CommandCode::Invalid | CommandCode::NoCommand => {
                return Err(DecodeError::NotDispatchable(code))
            }
            CommandCode::Swap => Command::Swap,
            CommandCode::FillScreen => Command::FillScreen {
                color: reader.peek(0).ok_or(truncated)?,
            },
            CommandCode::FillRect => Command::FillRect(Rect::decode(&mut reader).ok_or(truncated)?),
            CommandCode::DrawRect => Command::DrawRect(Rect::decode(&mut reader).ok_or(truncated)?),
            CommandCode::SetFont => Command::SetFont {
                font: reader.peek(0).ok_or(truncated)?,
            },
            CommandCode::SetTextSize => Command::SetTextSize {
                size: reader.peek(0).ok_or(truncated)?,
            },
            CommandCode::SetTextColor => Command::SetTextColor {
                color: reader.peek(0).ok_or(truncated)?,
            },
            CommandCode::SetCursor => {
                reader.reset();
                Command::SetCursor {
                    x: reader.next().ok_or(truncated)?,
                    y: reader.next().ok_or(truncated)?,
                }
            }
            CommandCode::Print => Command::Print {
                text: decode_text(code, &mut reader)?,
            },
            CommandCode::Println => Command::Println {
                text: decode_text(code, &mut reader)?,
            },
        };

        Ok(command)
    }
}

fn decode_text<'a>(code: CommandCode, reader: &mut ParamReader<'a>) -> Result<&'a str, DecodeError> {
    reader.reset();
    let bytes = reader.next_bytes().ok_or(DecodeError::Truncated(code))?;
    core::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidText(code))
}
