//! mifsprite - Convert PNG sprites to and from MIF memory images
//!
//! A command-line tool for building block-RAM initialization files from a
//! directory of sprites, and for dumping such files back to PNG.

mod preset;
mod sprites;

use clap::{Args, Parser, Subcommand};
use log::{error, info, warn, LevelFilter};
use mif_sprite::{encode_sprites, frames_from_records, frames_from_values, read_mif, write_mif};
use preset::{LayoutArgs, Preset};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mifsprite")]
#[command(version)]
#[command(about = "Convert PNG sprites to and from MIF memory images", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode PNG sprites into one MIF file
    Encode(EncodeArgs),

    /// Decode a MIF file into PNG sprites
    Decode(DecodeArgs),
}

#[derive(Debug, Args)]
struct EncodeArgs {
    /// Directory of PNG sprites, or a single PNG file
    #[arg(short, long, default_value = "image")]
    input: PathBuf,

    /// Output MIF file
    #[arg(short, long, default_value = "images.mif")]
    output: PathBuf,

    /// Sprite width in pixels
    #[arg(long, default_value_t = 16)]
    width: usize,

    /// Sprite height in pixels
    #[arg(long, default_value_t = 16)]
    height: usize,

    /// Value encoding and file layout
    #[arg(short, long, value_enum, default_value_t = Preset::Cube)]
    encoding: Preset,

    /// Scale sprites of another size (nearest neighbour) instead of failing
    #[arg(long)]
    resize: bool,

    /// Explicit DEPTH; the remaining addresses hold the sentinel value
    #[arg(long)]
    depth: Option<usize>,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Input MIF file
    #[arg(short, long, default_value = "images.mif")]
    input: PathBuf,

    /// Output directory, or a .png file when a single frame is decoded
    #[arg(short, long, default_value = "output_images")]
    output: PathBuf,

    /// Sprite width in pixels
    #[arg(long, default_value_t = 16)]
    width: usize,

    /// Sprite height in pixels
    #[arg(long, default_value_t = 16)]
    height: usize,

    /// Value encoding and file layout
    #[arg(short, long, value_enum, default_value_t = Preset::Cube)]
    encoding: Preset,

    /// Decode this many frames by address lookup; missing addresses get the sentinel
    #[arg(long)]
    frames: Option<usize>,

    #[command(flatten)]
    layout: LayoutArgs,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn encode(args: &EncodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let paths = sprites::collect_pngs(&args.input)
        .map_err(|e| format!("Failed to read '{}': {}", args.input.display(), e))?;
    if paths.is_empty() {
        error!("No PNG images found in '{}'", args.input.display());
        return Ok(());
    }

    // Everything is loaded and validated before the output is touched.
    let mut pixels = Vec::with_capacity(paths.len());
    for path in &paths {
        pixels.push(sprites::load_sprite(
            path,
            args.width,
            args.height,
            args.resize,
        )?);
    }

    let palette = args.encoding.palette();
    let encoding = args.encoding.encoding(&palette);
    let values = encode_sprites(
        pixels.iter().map(Vec::as_slice),
        args.width,
        args.height,
        &encoding,
    )?;

    let mut opts = args.encoding.write_options(&encoding, &args.layout);
    opts.depth = args.depth;
    let mif = write_mif(&values, &opts)?;
    fs::write(&args.output, &mif)
        .map_err(|e| format!("Failed to write '{}': {}", args.output.display(), e))?;

    info!(
        "Encoded {} image(s) of {}x{} into '{}' (DEPTH={})",
        paths.len(),
        args.width,
        args.height,
        args.output.display(),
        opts.depth.unwrap_or(values.len())
    );
    Ok(())
}

fn decode(args: &DecodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = match fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error!("MIF file '{}' not found", args.input.display());
            return Ok(());
        }
        Err(e) => return Err(format!("Failed to read '{}': {}", args.input.display(), e).into()),
    };

    let document = read_mif(&text, &args.encoding.read_options(&args.layout));
    let palette = args.encoding.palette();
    let encoding = args.encoding.encoding(&palette);
    let frames = match args.frames {
        Some(count) => {
            frames_from_records(&document.records, args.width, args.height, count, &encoding)?
        }
        None => frames_from_values(&document.values(), args.width, args.height, &encoding)?,
    };

    if frames.is_empty() {
        warn!(
            "'{}' holds {} values, not enough for one {}x{} frame",
            args.input.display(),
            document.len(),
            args.width,
            args.height
        );
        return Ok(());
    }

    let png_output = args
        .output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    let output = if png_output && frames.len() == 1 {
        sprites::save_frame(&frames[0], &args.output)?;
        args.output.clone()
    } else {
        let dir = if png_output {
            let dir = args.output.with_extension("");
            warn!(
                "{} frames do not fit in '{}', writing them to '{}' instead",
                frames.len(),
                args.output.display(),
                dir.display()
            );
            dir
        } else {
            args.output.clone()
        };
        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;
        for (i, frame) in frames.iter().enumerate() {
            sprites::save_frame(frame, &sprites::frame_path(&dir, i))?;
        }
        dir
    };

    info!(
        "Decoded {} frame(s) of {}x{} from {} values into '{}'",
        frames.len(),
        args.width,
        args.height,
        document.len(),
        output.display()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Encode(args) => encode(args),
        Commands::Decode(args) => decode(args),
    }
}
