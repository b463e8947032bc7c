//! Fixed color tables shared by the encode and decode sides.
//!
//! Both directions must reproduce the same table byte for byte, so a palette is
//! an explicitly constructed, immutable value rather than global state.

use crate::{MifError, Result};

const PALETTE_MAX: usize = 256;
const CUBE_LEVELS: u8 = 6;
const CUBE_STEP: u8 = 51;

/// Color lookup table matching the 16-entry ROM in the display controller.
const CURATED: [(u8, u8, u8); 16] = [
    (0xf0, 0xf0, 0xf0),
    (0xb0, 0xa0, 0xa0),
    (0xa0, 0xa0, 0xb0),
    (0xa0, 0xa0, 0xa0),
    (0xb0, 0x30, 0x20),
    (0xb0, 0x20, 0x20),
    (0xe0, 0xe0, 0x90),
    (0xe0, 0x90, 0x20),
    (0xe0, 0x90, 0x10),
    (0x90, 0x40, 0x00),
    (0x60, 0x60, 0x60),
    (0x60, 0x60, 0x00),
    (0x60, 0x00, 0x00),
    (0x50, 0x00, 0x70),
    (0x00, 0x40, 0x40),
    (0x00, 0x00, 0x00),
];

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance in RGB space.
    #[inline]
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let dr = self.r.abs_diff(other.r) as u32;
        let dg = self.g.abs_diff(other.g) as u32;
        let db = self.b.abs_diff(other.b) as u32;
        dr * dr + dg * dg + db * db
    }

    /// Packs the color as `0xRRGGBB`.
    #[inline]
    pub const fn to_u24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpacks `0xRRGGBB`; bits above 24 are ignored.
    #[inline]
    pub const fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// An ordered, index-addressable color table.
///
/// Indices are contiguous from 0. One entry is designated the *sentinel*: it is
/// substituted whenever a decoder meets a missing address or an index outside the
/// table. By default the sentinel is the last entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
    sentinel: usize,
}

impl Palette {
    /// Builds a palette from an explicit color list (1 to 256 entries).
    pub fn new(colors: Vec<Rgb>) -> Result<Self> {
        if colors.is_empty() || colors.len() > PALETTE_MAX {
            return Err(MifError::InvalidPalette(format!(
                "expected 1 to {PALETTE_MAX} colors, got {}",
                colors.len()
            )));
        }
        let sentinel = colors.len() - 1;
        Ok(Self { colors, sentinel })
    }

    /// The curated 16-entry table (4-bit indices). Index 0xF is black.
    pub fn curated() -> Self {
        let colors = CURATED
            .iter()
            .map(|&(r, g, b)| Rgb::new(r, g, b))
            .collect::<Vec<_>>();
        Self {
            sentinel: colors.len() - 1,
            colors,
        }
    }

    /// The generated 256-entry table (8-bit indices).
    ///
    /// Entries `0..216` walk the 6×6×6 cube `{0, 51, .., 255}` with red outermost
    /// and blue innermost. Entries `216..256` are filler, where filler `i` is
    /// `((i * 47) % 256, (i * 91) % 256, (i * 137) % 256)`.
    pub fn generated() -> Self {
        let mut colors = Vec::with_capacity(PALETTE_MAX);
        for r in 0..CUBE_LEVELS {
            for g in 0..CUBE_LEVELS {
                for b in 0..CUBE_LEVELS {
                    colors.push(Rgb::new(r * CUBE_STEP, g * CUBE_STEP, b * CUBE_STEP));
                }
            }
        }

        let filler = PALETTE_MAX - colors.len();
        for i in 0..filler as u32 {
            colors.push(Rgb::new(
                (i * 47 % 256) as u8,
                (i * 91 % 256) as u8,
                (i * 137 % 256) as u8,
            ));
        }

        Self {
            colors,
            sentinel: PALETTE_MAX - 1,
        }
    }

    /// Replaces the sentinel entry.
    pub fn with_sentinel(mut self, index: usize) -> Result<Self> {
        if index >= self.colors.len() {
            return Err(MifError::InvalidPalette(format!(
                "sentinel index {index} is outside a palette of {} colors",
                self.colors.len()
            )));
        }
        self.sentinel = index;
        Ok(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; a palette holds at least one color.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    #[inline]
    pub fn sentinel_index(&self) -> usize {
        self.sentinel
    }

    #[inline]
    pub fn sentinel_color(&self) -> Rgb {
        self.colors[self.sentinel]
    }

    /// Color for a decoded value, falling back to the sentinel outside the table.
    #[inline]
    pub fn color_or_sentinel(&self, value: u32) -> Rgb {
        usize::try_from(value)
            .ok()
            .and_then(|index| self.get(index))
            .unwrap_or_else(|| self.sentinel_color())
    }

    /// Bits needed to address every entry: 4 for 16 colors, 8 for 256.
    pub fn index_bits(&self) -> u32 {
        let highest = self.colors.len() - 1;
        (usize::BITS - highest.leading_zeros()).max(1)
    }

    /// Index of the entry with the smallest squared distance to `color`.
    ///
    /// The scan is linear in index order and only a strictly smaller distance
    /// replaces the current best, so on ties the lowest index wins.
    pub fn nearest_index(&self, color: Rgb) -> usize {
        let mut best_index = 0;
        let mut best_distance = u32::MAX;
        for (index, &entry) in self.colors.iter().enumerate() {
            let distance = color.distance_squared(entry);
            if distance < best_distance {
                best_distance = distance;
                best_index = index;
                if distance == 0 {
                    break;
                }
            }
        }
        best_index
    }
}
