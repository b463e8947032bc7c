//! Named file layouts for the `--encoding` option.

use clap::{Args, ValueEnum};
use mif_sprite::{Palette, PixelEncoding, Radix, ReadOptions, ValueFormat, WriteOptions};

const CUBE_COMMENT: &str = "8-bit palette indexed sprites (.mif) generated from PNGs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// 16-color curated palette, 4-bit indices
    Curated,
    /// 256-color generated palette (6x6x6 cube + filler), 8-bit indices
    #[default]
    Cube,
    /// Packed 24-bit RRGGBB, transparent pixels become 000000
    Rgb,
    /// 4-bit grayscale
    Gray,
}

/// Per-run overrides of a preset's file layout.
#[derive(Debug, Clone, Default, Args)]
pub struct LayoutArgs {
    /// Address radix (HEX or DEC)
    #[arg(long)]
    pub address_radix: Option<Radix>,

    /// Data radix (HEX or DEC)
    #[arg(long)]
    pub data_radix: Option<Radix>,

    /// Minimum address digits (0 = unpadded)
    #[arg(long)]
    pub address_digits: Option<usize>,

    /// Minimum value digits (0 = unpadded)
    #[arg(long)]
    pub value_digits: Option<usize>,
}

impl Preset {
    /// The palette indexed presets encode against. Unused by `rgb` and `gray`.
    pub fn palette(self) -> Palette {
        match self {
            Preset::Curated => Palette::curated(),
            _ => Palette::generated(),
        }
    }

    pub fn encoding(self, palette: &Palette) -> PixelEncoding<'_> {
        match self {
            Preset::Curated | Preset::Cube => PixelEncoding::Indexed(palette),
            Preset::Rgb => PixelEncoding::Rgb24,
            Preset::Gray => PixelEncoding::Gray4,
        }
    }

    pub fn write_options(self, encoding: &PixelEncoding<'_>, layout: &LayoutArgs) -> WriteOptions {
        let mut opts = WriteOptions {
            fill_value: encoding.sentinel_value(),
            ..WriteOptions::new(encoding.bit_width())
        };
        match self {
            Preset::Cube => {
                opts.address_radix = Radix::Hex;
                opts.address_digits = 4;
                opts.comment = Some(CUBE_COMMENT.to_string());
            }
            Preset::Curated | Preset::Gray => opts.value_digits = Some(0),
            Preset::Rgb => {}
        }

        if let Some(radix) = layout.address_radix {
            opts.address_radix = radix;
        }
        if let Some(radix) = layout.data_radix {
            opts.data_radix = radix;
        }
        if let Some(digits) = layout.address_digits {
            opts.address_digits = digits;
        }
        if layout.value_digits.is_some() {
            opts.value_digits = layout.value_digits;
        }
        opts
    }

    pub fn read_options(self, layout: &LayoutArgs) -> ReadOptions {
        let value_format = match self {
            Preset::Rgb => ValueFormat::RgbHex,
            _ => ValueFormat::Number(layout.data_radix.unwrap_or_default()),
        };
        ReadOptions {
            address_radix: layout.address_radix,
            value_format,
            check_depth: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mif_sprite::write_mif;

    fn render(preset: Preset, values: &[u32]) -> String {
        let palette = preset.palette();
        let encoding = preset.encoding(&palette);
        let opts = preset.write_options(&encoding, &LayoutArgs::default());
        write_mif(values, &opts).unwrap()
    }

    #[test]
    fn test_cube_layout() {
        let mif = render(Preset::Cube, &[0x05, 0xd7]);
        assert_eq!(
            mif,
            "-- 8-bit palette indexed sprites (.mif) generated from PNGs\n\
             WIDTH=8;\nDEPTH=2;\nADDRESS_RADIX=HEX;\nDATA_RADIX=HEX;\n\
             CONTENT BEGIN\n0000 : 05;\n0001 : D7;\nEND;\n"
        );
    }

    #[test]
    fn test_curated_layout_is_unpadded() {
        let values: Vec<u32> = (0..11).collect();
        let mif = render(Preset::Curated, &values);
        assert!(mif.starts_with("WIDTH=4;\nDEPTH=11;\nADDRESS_RADIX=DEC;\nDATA_RADIX=HEX;\n"));
        assert!(mif.contains("\n9 : 9;\n10 : A;\nEND;\n"));
    }

    #[test]
    fn test_rgb_and_gray_layouts() {
        let mif = render(Preset::Rgb, &[0x00ff00]);
        assert!(mif.contains("WIDTH=24;\n"));
        assert!(mif.contains("\n0 : 00FF00;\n"));

        let mif = render(Preset::Gray, &[0xf]);
        assert!(mif.contains("WIDTH=4;\n"));
        assert!(mif.contains("\n0 : F;\n"));
    }

    #[test]
    fn test_layout_overrides() {
        let palette = Preset::Curated.palette();
        let encoding = Preset::Curated.encoding(&palette);
        let layout = LayoutArgs {
            address_radix: Some(Radix::Hex),
            data_radix: Some(Radix::Dec),
            address_digits: Some(3),
            value_digits: Some(2),
        };
        let opts = Preset::Curated.write_options(&encoding, &layout);
        let mif = write_mif(&[12], &opts).unwrap();
        assert!(mif.contains("ADDRESS_RADIX=HEX;\nDATA_RADIX=DEC;\n"));
        assert!(mif.contains("\n000 : 12;\n"));

        let read = Preset::Curated.read_options(&layout);
        assert_eq!(read.address_radix, Some(Radix::Hex));
        assert_eq!(read.value_format, ValueFormat::Number(Radix::Dec));
    }

    #[test]
    fn test_fill_value_is_sentinel() {
        let palette = Preset::Curated.palette();
        let encoding = Preset::Curated.encoding(&palette);
        let opts = Preset::Curated.write_options(&encoding, &LayoutArgs::default());
        assert_eq!(opts.fill_value, 0xF);

        let encoding = Preset::Rgb.encoding(&palette);
        let opts = Preset::Rgb.write_options(&encoding, &LayoutArgs::default());
        assert_eq!(opts.fill_value, 0);
        assert_eq!(
            Preset::Rgb.read_options(&LayoutArgs::default()).value_format,
            ValueFormat::RgbHex
        );
    }
}
