//! Pixel → value encodings and the MIF writer.
//!
//! The writer emits the header fields in fixed order, one `<address> : <value>;`
//! record per value, and a closing `END;` line.

use std::fmt;

use log::{debug, info};

use crate::{hex_digits, palette::Palette, MifError, Radix, Result, Rgb};

const RGBA_SIZE: usize = 4;
const GRAY4_MAX: u32 = 0xF;

/// How a single RGBA pixel maps to a MIF value, and back.
#[derive(Debug, Clone, Copy)]
pub enum PixelEncoding<'a> {
    /// Nearest palette index.
    Indexed(&'a Palette),
    /// Packed `0xRRGGBB`; fully transparent pixels become `0x000000`.
    Rgb24,
    /// 4-bit luminance level.
    Gray4,
}

impl PixelEncoding<'_> {
    /// Bits per value, i.e. the `WIDTH` header field.
    pub fn bit_width(&self) -> u32 {
        match self {
            PixelEncoding::Indexed(palette) => palette.index_bits(),
            PixelEncoding::Rgb24 => 24,
            PixelEncoding::Gray4 => 4,
        }
    }

    /// Value used for missing addresses and for padding up to an explicit depth.
    pub fn sentinel_value(&self) -> u32 {
        match self {
            PixelEncoding::Indexed(palette) => palette.sentinel_index() as u32,
            PixelEncoding::Rgb24 => 0,
            PixelEncoding::Gray4 => GRAY4_MAX,
        }
    }

    #[inline]
    pub fn encode_pixel(&self, [r, g, b, a]: [u8; 4]) -> u32 {
        match self {
            PixelEncoding::Indexed(palette) => palette.nearest_index(Rgb::new(r, g, b)) as u32,
            PixelEncoding::Rgb24 => {
                if a == 0 {
                    0
                } else {
                    Rgb::new(r, g, b).to_u24()
                }
            }
            PixelEncoding::Gray4 => luma(r, g, b) >> 4,
        }
    }

    /// Inverse of [`encode_pixel`](Self::encode_pixel) up to quantization loss.
    /// Out-of-range values decode to the sentinel color.
    #[inline]
    pub fn decode_value(&self, value: u32) -> Rgb {
        match self {
            PixelEncoding::Indexed(palette) => palette.color_or_sentinel(value),
            PixelEncoding::Rgb24 => Rgb::from_u24(value),
            PixelEncoding::Gray4 => {
                let level = (value.min(GRAY4_MAX) * 17) as u8;
                Rgb::new(level, level, level)
            }
        }
    }
}

/// ITU-R 601-2 luma in 16.16 fixed point, rounded.
#[inline]
fn luma(r: u8, g: u8, b: u8) -> u32 {
    (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16
}

/// Encodes a row-major RGBA buffer. A trailing partial pixel is ignored.
pub fn encode_pixels(rgba: &[u8], encoding: &PixelEncoding<'_>) -> Vec<u32> {
    rgba.chunks_exact(RGBA_SIZE)
        .map(|c| encoding.encode_pixel([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Encodes a batch of equally sized RGBA sprites into one value stream.
///
/// Sprite `n`, pixel `(x, y)` lands at `n * width * height + y * width + x`.
/// Every buffer is validated before any value is produced.
pub fn encode_sprites<'a, I>(
    sprites: I,
    width: usize,
    height: usize,
    encoding: &PixelEncoding<'_>,
) -> Result<Vec<u32>>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let expected = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(RGBA_SIZE))
        .filter(|&size| size > 0)
        .ok_or(MifError::InvalidDimensions { width, height })?;
    let sprites: Vec<&[u8]> = sprites.into_iter().collect();
    if let Some(bad) = sprites.iter().find(|s| s.len() != expected) {
        return Err(MifError::BufferSizeMismatch {
            expected,
            actual: bad.len(),
        });
    }

    let mut values = Vec::with_capacity(sprites.len() * (expected / RGBA_SIZE));
    for sprite in &sprites {
        values.extend(encode_pixels(sprite, encoding));
    }
    debug!(
        "encoded {} sprite(s) of {width}x{height} into {} values",
        sprites.len(),
        values.len()
    );
    Ok(values)
}

/// Layout options for [`write_mif`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Bits per value (`WIDTH`).
    pub bit_width: u32,
    pub address_radix: Radix,
    pub data_radix: Radix,
    /// Minimum address digits; 0 leaves addresses unpadded.
    pub address_digits: usize,
    /// Minimum value digits. `None` pads hexadecimal values to `ceil(bit_width / 4)`
    /// digits and leaves decimal values unpadded.
    pub value_digits: Option<usize>,
    /// Explicit `DEPTH`. Addresses past the last value are written with `fill_value`.
    pub depth: Option<usize>,
    pub fill_value: u32,
    /// Written as a leading `-- ` line.
    pub comment: Option<String>,
}

impl WriteOptions {
    /// Decimal addresses, hexadecimal values padded to the bit width.
    pub fn new(bit_width: u32) -> Self {
        Self {
            bit_width,
            address_radix: Radix::Dec,
            data_radix: Radix::Hex,
            address_digits: 0,
            value_digits: None,
            depth: None,
            fill_value: 0,
            comment: None,
        }
    }

    fn effective_value_digits(&self) -> usize {
        match (self.value_digits, self.data_radix) {
            (Some(digits), _) => digits,
            (None, Radix::Hex) => hex_digits(self.bit_width),
            (None, Radix::Dec) => 0,
        }
    }

    fn check_value(&self, value: u32) -> Result<()> {
        if self.bit_width < u32::BITS && value >> self.bit_width != 0 {
            return Err(MifError::ValueOutOfRange {
                value,
                bit_width: self.bit_width,
            });
        }
        Ok(())
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Serializes `values` (address 0 upwards) as MIF text.
pub fn write_mif(values: &[u32], opts: &WriteOptions) -> Result<String> {
    let depth = opts.depth.unwrap_or(values.len());
    if depth < values.len() {
        return Err(MifError::DepthTooSmall {
            depth,
            values: values.len(),
        });
    }
    for &value in values {
        opts.check_value(value)?;
    }
    if depth > values.len() {
        opts.check_value(opts.fill_value)?;
    }

    let out = MifText {
        values,
        opts,
        depth,
        value_digits: opts.effective_value_digits(),
    }
    .to_string();

    info!(
        "wrote MIF: WIDTH={} DEPTH={depth} ({} values, {} filled)",
        opts.bit_width,
        values.len(),
        depth - values.len()
    );
    Ok(out)
}

/// Full MIF text for already validated values.
struct MifText<'a> {
    values: &'a [u32],
    opts: &'a WriteOptions,
    depth: usize,
    value_digits: usize,
}

impl fmt::Display for MifText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opts = self.opts;
        if let Some(comment) = &opts.comment {
            writeln!(f, "-- {comment}")?;
        }
        writeln!(f, "WIDTH={};", opts.bit_width)?;
        writeln!(f, "DEPTH={};", self.depth)?;
        writeln!(f, "ADDRESS_RADIX={};", opts.address_radix)?;
        writeln!(f, "DATA_RADIX={};", opts.data_radix)?;
        f.write_str("CONTENT BEGIN\n")?;

        let padding = std::iter::repeat(opts.fill_value).take(self.depth - self.values.len());
        for (address, value) in self.values.iter().copied().chain(padding).enumerate() {
            opts.address_radix.write_padded(f, address as u32, opts.address_digits)?;
            f.write_str(" : ")?;
            opts.data_radix.write_padded(f, value, self.value_digits)?;
            f.write_str(";\n")?;
        }

        f.write_str("END;\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_single_value() {
        let mif = write_mif(&[4], &WriteOptions::new(4)).unwrap();
        assert_eq!(
            mif,
            "WIDTH=4;\nDEPTH=1;\nADDRESS_RADIX=DEC;\nDATA_RADIX=HEX;\nCONTENT BEGIN\n0 : 4;\nEND;\n"
        );
    }

    #[test]
    fn test_write_hex_addresses_padded() {
        let opts = WriteOptions {
            address_radix: Radix::Hex,
            address_digits: 4,
            ..WriteOptions::new(8)
        };
        let mif = write_mif(&[0x00, 0x1f, 0xd7], &opts).unwrap();
        assert!(mif.contains("ADDRESS_RADIX=HEX;\n"));
        assert!(mif.contains("\n0000 : 00;\n0001 : 1F;\n0002 : D7;\nEND;\n"));
    }

    #[test]
    fn test_write_rgb24_value_width() {
        let mif = write_mif(&[0x00ff00, 0x000001], &WriteOptions::new(24)).unwrap();
        assert!(mif.contains("\n0 : 00FF00;\n1 : 000001;\n"));
    }

    #[test]
    fn test_write_decimal_data() {
        let opts = WriteOptions {
            data_radix: Radix::Dec,
            ..WriteOptions::new(8)
        };
        let mif = write_mif(&[7, 255], &opts).unwrap();
        assert!(mif.contains("DATA_RADIX=DEC;\n"));
        assert!(mif.contains("\n0 : 7;\n1 : 255;\n"));
    }

    #[test]
    fn test_write_depth_fill() {
        let opts = WriteOptions {
            depth: Some(4),
            fill_value: 0xF,
            ..WriteOptions::new(4)
        };
        let mif = write_mif(&[1, 2], &opts).unwrap();
        assert!(mif.contains("DEPTH=4;\n"));
        assert!(mif.contains("\n0 : 1;\n1 : 2;\n2 : F;\n3 : F;\nEND;\n"));
    }

    #[test]
    fn test_write_depth_too_small() {
        let opts = WriteOptions {
            depth: Some(1),
            ..WriteOptions::new(4)
        };
        assert!(matches!(
            write_mif(&[1, 2], &opts),
            Err(MifError::DepthTooSmall { depth: 1, values: 2 })
        ));
    }

    #[test]
    fn test_write_value_out_of_range() {
        assert!(matches!(
            write_mif(&[16], &WriteOptions::new(4)),
            Err(MifError::ValueOutOfRange {
                value: 16,
                bit_width: 4
            })
        ));
    }

    #[test]
    fn test_write_comment_and_empty() {
        let opts = WriteOptions {
            comment: Some("sprites".to_string()),
            ..WriteOptions::new(8)
        };
        let mif = write_mif(&[], &opts).unwrap();
        assert_eq!(
            mif,
            "-- sprites\nWIDTH=8;\nDEPTH=0;\nADDRESS_RADIX=DEC;\nDATA_RADIX=HEX;\nCONTENT BEGIN\nEND;\n"
        );
    }

    #[test]
    fn test_encode_rgb24_transparent_is_black() {
        let encoding = PixelEncoding::Rgb24;
        assert_eq!(encoding.encode_pixel([0x12, 0x34, 0x56, 255]), 0x123456);
        assert_eq!(encoding.encode_pixel([0x12, 0x34, 0x56, 1]), 0x123456);
        assert_eq!(encoding.encode_pixel([0x12, 0x34, 0x56, 0]), 0);
    }

    #[test]
    fn test_encode_gray4() {
        let encoding = PixelEncoding::Gray4;
        assert_eq!(encoding.encode_pixel([0, 0, 0, 255]), 0);
        assert_eq!(encoding.encode_pixel([255, 255, 255, 255]), 0xF);
        // luma(255, 0, 0) = 76
        assert_eq!(encoding.encode_pixel([255, 0, 0, 255]), 4);
        assert_eq!(encoding.decode_value(0xF), Rgb::new(255, 255, 255));
        assert_eq!(encoding.decode_value(0x40), Rgb::new(255, 255, 255));
        assert_eq!(encoding.decode_value(1), Rgb::new(17, 17, 17));
    }

    #[test]
    fn test_bit_widths() {
        let curated = Palette::curated();
        let generated = Palette::generated();
        assert_eq!(PixelEncoding::Indexed(&curated).bit_width(), 4);
        assert_eq!(PixelEncoding::Indexed(&generated).bit_width(), 8);
        assert_eq!(PixelEncoding::Rgb24.bit_width(), 24);
        assert_eq!(PixelEncoding::Gray4.bit_width(), 4);
    }

    #[test]
    fn test_encode_sprites_validates_every_buffer() {
        let encoding = PixelEncoding::Rgb24;
        let good = [0u8; 16];
        let bad = [0u8; 12];
        let result = encode_sprites([&good[..], &bad[..]], 2, 2, &encoding);
        assert!(matches!(
            result,
            Err(MifError::BufferSizeMismatch {
                expected: 16,
                actual: 12
            })
        ));
        assert!(matches!(
            encode_sprites([&good[..]], 0, 2, &encoding),
            Err(MifError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_sprites([&good[..]], usize::MAX, 2, &encoding),
            Err(MifError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_sprites([&good[..]], usize::MAX / 4 + 1, 1, &encoding),
            Err(MifError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_sprites_is_frame_major() {
        let encoding = PixelEncoding::Rgb24;
        let first = [1, 0, 0, 255, 2, 0, 0, 255];
        let second = [3, 0, 0, 255, 4, 0, 0, 255];
        let values = encode_sprites([&first[..], &second[..]], 2, 1, &encoding).unwrap();
        assert_eq!(values, vec![0x010000, 0x020000, 0x030000, 0x040000]);
    }
}
