//! # mif_sprite
//!
//! Conversion between RGBA sprite buffers and Memory Initialization Files (MIF),
//! the text format used to preload block RAM for HDL simulation and synthesis.
//!
//! ## Features
//!
//! - **Palette**: the curated 16-color table and the generated 256-color table
//!   (6×6×6 cube plus filler), with first-wins nearest-color lookup
//! - **Encoder**: pixel → value encodings (palette index, packed RGB, 4-bit gray)
//!   and a MIF writer with configurable radix and zero padding
//! - **Decoder**: a tolerant, line-oriented MIF reader modelled as an explicit
//!   state machine, plus frame reshaping for multi-sprite sheets
//!
//! ## Quick Start
//!
//! ### Encoding a sprite to MIF
//!
//! ```
//! use mif_sprite::{encode_sprites, write_mif, Palette, PixelEncoding, WriteOptions};
//!
//! let palette = Palette::curated();
//! let encoding = PixelEncoding::Indexed(&palette);
//! let rgba = [255u8, 0, 0, 255]; // one red pixel
//! let values = encode_sprites([&rgba[..]], 1, 1, &encoding)?;
//! let mif = write_mif(&values, &WriteOptions::new(encoding.bit_width()))?;
//! assert!(mif.contains("\n0 : 5;\n"));
//! # Ok::<(), mif_sprite::MifError>(())
//! ```
//!
//! ### Decoding MIF back to frames
//!
//! ```
//! use mif_sprite::{frames_from_values, read_mif, Palette, PixelEncoding, ReadOptions};
//!
//! let text = "WIDTH=8;\nDEPTH=1;\nADDRESS_RADIX=HEX;\nDATA_RADIX=HEX;\nCONTENT BEGIN\n0000 : D7;\nEND;\n";
//! let document = read_mif(text, &ReadOptions::default());
//! let palette = Palette::generated();
//! let frames = frames_from_values(&document.values(), 1, 1, &PixelEncoding::Indexed(&palette))?;
//! assert_eq!(frames.len(), 1);
//! # Ok::<(), mif_sprite::MifError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod decoder;
pub mod encoder;
pub mod frames;
pub mod palette;

pub use decoder::{
    read_mif, HeaderField, LineEvent, MifDocument, MifHeader, MifReader, ParseState, ReadOptions,
    Record, ValueFormat,
};
pub use encoder::{encode_pixels, encode_sprites, write_mif, PixelEncoding, WriteOptions};
pub use frames::{frames_from_records, frames_from_values, reshape, Frame};
pub use palette::{Palette, Rgb};

/// Errors that can occur while encoding or decoding MIF sprite data.
#[derive(Debug, Error)]
pub enum MifError {
    /// Sprite width or height is zero
    #[error("invalid sprite dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Pixel buffer size doesn't match the sprite dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A value does not fit into the declared WIDTH
    #[error("value {value:#X} does not fit in {bit_width} bits")]
    ValueOutOfRange { value: u32, bit_width: u32 },

    /// Explicit DEPTH is smaller than the number of values
    #[error("depth {depth} cannot hold {values} values")]
    DepthTooSmall { depth: usize, values: usize },

    /// Palette construction failed
    #[error("invalid palette: {0}")]
    InvalidPalette(String),
}

/// Result type for MIF operations.
pub type Result<T> = core::result::Result<T, MifError>;

/// Numeric base used to render addresses or values in a MIF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Radix {
    #[default]
    Hex,
    Dec,
}

impl Radix {
    #[inline]
    pub const fn base(self) -> u32 {
        match self {
            Radix::Hex => 16,
            Radix::Dec => 10,
        }
    }

    /// Renders `value` zero-padded to at least `digits` digits.
    /// Hexadecimal output is uppercase.
    pub fn format(self, value: u32, digits: usize) -> String {
        match self {
            Radix::Hex => format!("{value:0digits$X}"),
            Radix::Dec => format!("{value:0digits$}"),
        }
    }

    /// Writes `value` zero-padded to at least `digits` digits without allocating.
    pub fn write_padded<W: fmt::Write>(self, out: &mut W, value: u32, digits: usize) -> fmt::Result {
        match self {
            Radix::Hex => write!(out, "{value:0digits$X}"),
            Radix::Dec => write!(out, "{value:0digits$}"),
        }
    }

    /// Parses a bare number in this radix. Signs, prefixes and empty input are rejected.
    pub fn parse(self, text: &str) -> Option<u32> {
        if text.is_empty() || !text.chars().all(|c| c.is_digit(self.base())) {
            return None;
        }
        u32::from_str_radix(text, self.base()).ok()
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Radix::Hex => f.write_str("HEX"),
            Radix::Dec => f.write_str("DEC"),
        }
    }
}

impl FromStr for Radix {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("hex") {
            Ok(Radix::Hex)
        } else if s.eq_ignore_ascii_case("dec") {
            Ok(Radix::Dec)
        } else {
            Err(format!("unknown radix '{s}' (expected HEX or DEC)"))
        }
    }
}

/// Number of hex digits needed for a value of `bit_width` bits.
#[inline]
pub(crate) const fn hex_digits(bit_width: u32) -> usize {
    bit_width.div_ceil(4) as usize
}
