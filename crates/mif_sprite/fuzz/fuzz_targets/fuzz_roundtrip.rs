#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mif_sprite::{read_mif, write_mif, Radix, ReadOptions, Record, ValueFormat, WriteOptions};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    bit_width: u8,
    hex_addresses: bool,
    hex_values: bool,
    address_digits: u8,
    values: Vec<u32>,
}

fn radix(hex: bool) -> Radix {
    if hex {
        Radix::Hex
    } else {
        Radix::Dec
    }
}

fuzz_target!(|input: FuzzInput| {
    let bit_width = [4u32, 8, 24][input.bit_width as usize % 3];
    let mask = (1u32 << bit_width) - 1;
    let values: Vec<u32> = input.values.iter().map(|v| v & mask).collect();

    let opts = WriteOptions {
        address_radix: radix(input.hex_addresses),
        data_radix: radix(input.hex_values),
        address_digits: (input.address_digits % 8) as usize,
        ..WriteOptions::new(bit_width)
    };
    let text = match write_mif(&values, &opts) {
        Ok(text) => text,
        Err(_) => return,
    };

    let options = ReadOptions {
        address_radix: Some(opts.address_radix),
        value_format: ValueFormat::Number(opts.data_radix),
        check_depth: true,
    };
    let document = read_mif(&text, &options);

    // Every written record must read back unchanged and in order
    let expected: Vec<Record> = values
        .iter()
        .enumerate()
        .map(|(address, &value)| Record::from((address as u32, value)))
        .collect();
    assert_eq!(document.records, expected);
    assert_eq!(document.depth_mismatch(), None);
});
