#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mif_sprite::{encode_sprites, write_mif, Palette, PixelEncoding, WriteOptions};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    encoding: u8,
    pixels: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let width = (input.width as usize).clamp(1, 32);
    let height = (input.height as usize).clamp(1, 32);

    let expected_size = width * height * 4;
    if input.pixels.len() < expected_size {
        return;
    }
    let sprites = input.pixels.chunks_exact(expected_size);

    let curated = Palette::curated();
    let generated = Palette::generated();
    let encoding = match input.encoding % 4 {
        0 => PixelEncoding::Indexed(&curated),
        1 => PixelEncoding::Indexed(&generated),
        2 => PixelEncoding::Rgb24,
        _ => PixelEncoding::Gray4,
    };

    // Encoded values always fit the declared width
    let values = encode_sprites(sprites, width, height, &encoding).expect("valid sprites");
    write_mif(&values, &WriteOptions::new(encoding.bit_width())).expect("values fit WIDTH");
});
