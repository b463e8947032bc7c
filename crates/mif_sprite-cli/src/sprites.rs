//! PNG loading and saving for sprite sheets.

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use log::debug;
use mif_sprite::Frame;

/// PNG files to encode, in file name order.
///
/// `input` may be a single file or a directory. A missing directory yields no
/// files; the caller reports that.
pub fn collect_pngs(input: &Path) -> io::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Loads `path` as RGBA8 of exactly `width` x `height`.
///
/// With `resize` the image is scaled with nearest-neighbour filtering first;
/// otherwise any other size is an error.
pub fn load_sprite(
    path: &Path,
    width: usize,
    height: usize,
    resize: bool,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?;
    let mut rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    if (w as usize, h as usize) != (width, height) {
        if !resize {
            return Err(format!(
                "'{}' is {}x{}, expected {}x{} (use --resize to scale it)",
                path.display(),
                w,
                h,
                width,
                height
            )
            .into());
        }
        debug!(
            "resizing '{}' from {w}x{h} to {width}x{height}",
            path.display()
        );
        rgba = imageops::resize(&rgba, width as u32, height as u32, FilterType::Nearest);
    }
    Ok(rgba.into_raw())
}

/// Writes one decoded frame as an RGB PNG.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<(), Box<dyn Error>> {
    let img = image::RgbImage::from_raw(frame.width as u32, frame.height as u32, frame.to_rgb8())
        .ok_or("Failed to create image from decoded frame")?;
    img.save(path)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    Ok(())
}

/// `sprite_{index}.png` inside `dir`.
pub fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("sprite_{index}.png"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use mif_sprite::Rgb;

    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mifsprite-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_collect_pngs_sorted_and_filtered() {
        let dir = scratch_dir("collect");
        for name in ["b.png", "a.PNG", "c.txt", "10.png"] {
            fs::write(dir.join(name), b"").unwrap();
        }
        fs::create_dir(dir.join("nested.png")).unwrap();

        let names: Vec<String> = collect_pngs(&dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["10.png", "a.PNG", "b.png"]);

        assert!(collect_pngs(&dir.join("missing")).unwrap().is_empty());
        let single = dir.join("b.png");
        assert_eq!(collect_pngs(&single).unwrap(), vec![single]);
    }

    #[test]
    fn test_load_sprite_checks_dimensions() {
        let dir = scratch_dir("dimensions");
        let path = dir.join("sprite.png");
        RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let pixels = load_sprite(&path, 4, 2, false).unwrap();
        assert_eq!(pixels.len(), 4 * 2 * 4);
        assert_eq!(&pixels[..4], &[10, 20, 30, 255]);

        let err = load_sprite(&path, 16, 16, false).unwrap_err();
        assert!(err.to_string().contains("4x2, expected 16x16"));
    }

    #[test]
    fn test_load_sprite_resizes_nearest() {
        let dir = scratch_dir("resize");
        let path = dir.join("checker.png");
        let img = RgbaImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        img.save(&path).unwrap();

        let pixels = load_sprite(&path, 4, 4, true).unwrap();
        assert_eq!(pixels.len(), 4 * 4 * 4);
        // Nearest-neighbour keeps pure colors, no blending.
        assert!(pixels
            .chunks_exact(4)
            .all(|p| p == [255, 255, 255, 255] || p == [0, 0, 0, 255]));
        assert_eq!(&pixels[..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_save_frame_roundtrip() {
        let dir = scratch_dir("save");
        let frame = Frame {
            width: 2,
            height: 1,
            pixels: vec![Rgb::new(0xb0, 0x30, 0x20), Rgb::new(0, 0x40, 0x40)],
        };
        let path = frame_path(&dir, 3);
        assert!(path.ends_with("sprite_3.png"));
        save_frame(&frame, &path).unwrap();

        let loaded = load_sprite(&path, 2, 1, false).unwrap();
        assert_eq!(loaded, frame.to_rgba8());
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let dir = scratch_dir("missing");
        let err = load_sprite(&dir.join("nope.png"), 1, 1, false).unwrap_err();
        assert!(err.to_string().starts_with("Failed to open '"));
    }
}
