#![no_main]

use libfuzzer_sys::fuzz_target;
use mif_sprite::{frames_from_values, read_mif, Palette, PixelEncoding, ReadOptions, ValueFormat};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // The reader never fails, whatever the input
    let document = read_mif(&text, &ReadOptions::default());
    let palette = Palette::curated();
    let _ = frames_from_values(&document.values(), 4, 4, &PixelEncoding::Indexed(&palette));

    let options = ReadOptions {
        value_format: ValueFormat::RgbHex,
        ..ReadOptions::default()
    };
    let document = read_mif(&text, &options);
    let _ = frames_from_values(&document.values(), 2, 2, &PixelEncoding::Rgb24);
});
