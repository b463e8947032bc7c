//! Reshaping a flat value stream into fixed-size sprite frames.
//!
//! Address `n * width * height + y * width + x` holds pixel `(x, y)` of frame `n`.

use log::debug;

use crate::{decoder::Record, encoder::PixelEncoding, MifError, Result, Rgb};

/// One decoded sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    /// Row-major pixels, `width * height` of them.
    pub pixels: Vec<Rgb>,
}

impl Frame {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// RGBA bytes (4 per pixel, opaque).
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgba()).collect()
    }

    /// RGB bytes (3 per pixel).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }
}

/// Splits `values` into complete `width * height` frames.
///
/// `frame_count = values.len() / (width * height)`; a trailing partial frame is
/// dropped, never padded.
pub fn reshape(values: &[u32], width: usize, height: usize) -> Result<Vec<&[u32]>> {
    let per_frame = frame_size(width, height)?;
    let frames = values.chunks_exact(per_frame);
    let dropped = frames.remainder().len();
    if dropped > 0 {
        debug!("dropping {dropped} trailing values that do not fill a {width}x{height} frame");
    }
    Ok(frames.collect())
}

/// Decodes the value sequence in input order into frames.
pub fn frames_from_values(
    values: &[u32],
    width: usize,
    height: usize,
    encoding: &PixelEncoding<'_>,
) -> Result<Vec<Frame>> {
    let frames = reshape(values, width, height)?
        .into_iter()
        .map(|chunk| Frame {
            width,
            height,
            pixels: chunk.iter().map(|&v| encoding.decode_value(v)).collect(),
        })
        .collect();
    Ok(frames)
}

/// Decodes `frame_count` frames by address lookup.
///
/// Every expected address is looked up in the records; a missing address takes
/// the encoding's sentinel value instead of failing.
pub fn frames_from_records(
    records: &[Record],
    width: usize,
    height: usize,
    frame_count: usize,
    encoding: &PixelEncoding<'_>,
) -> Result<Vec<Frame>> {
    let per_frame = frame_size(width, height)?;
    if frame_count.checked_mul(per_frame).is_none() {
        return Err(MifError::InvalidDimensions { width, height });
    }
    let map: std::collections::HashMap<u32, u32> =
        records.iter().map(|r| (r.address, r.value)).collect();
    let sentinel = encoding.sentinel_value();

    let mut missing = 0usize;
    let mut frames = Vec::new();
    for frame in 0..frame_count {
        let base = frame * per_frame;
        let pixels = (base..base + per_frame)
            .map(|address| {
                let value = u32::try_from(address)
                    .ok()
                    .and_then(|address| map.get(&address).copied())
                    .unwrap_or_else(|| {
                        missing += 1;
                        sentinel
                    });
                encoding.decode_value(value)
            })
            .collect();
        frames.push(Frame {
            width,
            height,
            pixels,
        });
    }
    if missing > 0 {
        debug!("{missing} addresses were missing and took the sentinel value {sentinel:#X}");
    }
    Ok(frames)
}

fn frame_size(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .filter(|&size| size > 0)
        .ok_or(MifError::InvalidDimensions { width, height })
}
