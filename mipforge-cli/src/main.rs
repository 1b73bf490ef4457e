//! mipforge CLI - compile images into GPU-ready texture streams.
//!
//! Decodes an input image, runs the compile pipeline (resize, optional
//! mipmaps, premultiply, flip), packs every level into the requested
//! wire format, and writes either a raw level dump or a container file
//! with a 64-byte header.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;

use mipforge::buffer::PixelBuffer;
use mipforge::compiler::{compile, CompileRequest, PackedTexture};
use mipforge::container::attributes::{ATTRIBUTES_COLOR, ATTRIBUTES_PREMULTIPLIED};
use mipforge::container::{basic_attributes, ContainerHeader, ImageFormat};
use mipforge::filter::BorderMode;
use mipforge::pack::PixelFormat;

mod error;

use error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WireFormat {
    /// One 8-bit channel
    A8,
    /// Two 8-bit channels
    Rg8,
    /// Three 8-bit channels
    Rgb8,
    /// Four 8-bit channels
    Rgba8,
    /// One half-float channel
    R16f,
    /// Two half-float channels
    Rg16f,
    /// Three half-float channels
    Rgb16f,
    /// Four half-float channels
    Rgba16f,
    /// One 32-bit float channel
    R32f,
    /// Two 32-bit float channels
    Rg32f,
    /// Three 32-bit float channels
    Rgb32f,
    /// Four 32-bit float channels
    Rgba32f,
    /// Packed 16-bit RGB (5-6-5)
    Rgb565,
    /// Packed 16-bit RGBA (4-4-4-4)
    Rgba4444,
    /// Packed 16-bit RGBA (5-5-5-1)
    Rgba5551,
}

impl WireFormat {
    fn pixel_format(self) -> PixelFormat {
        match self {
            WireFormat::A8 => PixelFormat::Uint8 { channels: 1 },
            WireFormat::Rg8 => PixelFormat::Uint8 { channels: 2 },
            WireFormat::Rgb8 => PixelFormat::Uint8 { channels: 3 },
            WireFormat::Rgba8 => PixelFormat::Uint8 { channels: 4 },
            WireFormat::R16f => PixelFormat::Half { channels: 1 },
            WireFormat::Rg16f => PixelFormat::Half { channels: 2 },
            WireFormat::Rgb16f => PixelFormat::Half { channels: 3 },
            WireFormat::Rgba16f => PixelFormat::Half { channels: 4 },
            WireFormat::R32f => PixelFormat::Float32 { channels: 1 },
            WireFormat::Rg32f => PixelFormat::Float32 { channels: 2 },
            WireFormat::Rgb32f => PixelFormat::Float32 { channels: 3 },
            WireFormat::Rgba32f => PixelFormat::Float32 { channels: 4 },
            WireFormat::Rgb565 => PixelFormat::Rgb565,
            WireFormat::Rgba4444 => PixelFormat::Rgba4444,
            WireFormat::Rgba5551 => PixelFormat::Rgba5551,
        }
    }

    /// Container format code for this wire layout, when one exists.
    ///
    /// The packed 16-bit formats and three-channel float layouts have
    /// no container representation; they are dump-only.
    fn container_format(self) -> Option<ImageFormat> {
        match self {
            WireFormat::A8 => Some(ImageFormat::R8),
            WireFormat::Rg8 => Some(ImageFormat::Rg8),
            WireFormat::Rgb8 => Some(ImageFormat::Rgb8),
            WireFormat::Rgba8 => Some(ImageFormat::Rgba8),
            WireFormat::R16f => Some(ImageFormat::R16f),
            WireFormat::Rg16f => Some(ImageFormat::Rg16f),
            WireFormat::Rgba16f => Some(ImageFormat::Rgba16f),
            WireFormat::R32f => Some(ImageFormat::R32f),
            WireFormat::Rg32f => Some(ImageFormat::Rg32f),
            WireFormat::Rgba32f => Some(ImageFormat::Rgba32f),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BorderModeArg {
    /// Wrap to the opposite edge (tiling textures)
    Wrap,
    /// Clamp to the nearest edge texel
    Clamp,
    /// Reflect at the edges
    Mirror,
}

impl From<BorderModeArg> for BorderMode {
    fn from(arg: BorderModeArg) -> Self {
        match arg {
            BorderModeArg::Wrap => BorderMode::Wrap,
            BorderModeArg::Clamp => BorderMode::Clamp,
            BorderModeArg::Mirror => BorderMode::Mirror,
        }
    }
}

#[derive(Parser)]
#[command(name = "mipforge")]
#[command(about = "Compile an image into a GPU-ready texture stream", long_about = None)]
#[command(version = mipforge::VERSION)]
struct Args {
    /// Input image (any format the decoder understands)
    input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Wire pixel format for the packed output
    #[arg(long, value_enum, default_value = "rgba8")]
    format: WireFormat,

    /// Target width in pixels (0 = source width)
    #[arg(long, default_value = "0")]
    width: usize,

    /// Target height in pixels (0 = source height)
    #[arg(long, default_value = "0")]
    height: usize,

    /// Build a mipmap chain (forces power-of-two dimensions)
    #[arg(long)]
    mipmaps: bool,

    /// Maximum number of mip levels (0 = down to 1x1)
    #[arg(long, default_value = "0")]
    max_levels: usize,

    /// Round dimensions up to powers of two even without mipmaps
    #[arg(long)]
    force_pow2: bool,

    /// Premultiply color channels by alpha
    #[arg(long)]
    premultiply: bool,

    /// Flip vertically for bottom-left origin conventions
    #[arg(long)]
    flip_y: bool,

    /// Border sampling mode during resizing
    #[arg(long, value_enum, default_value = "mirror")]
    border: BorderModeArg,

    /// Write a container file (64-byte header + packed levels) instead
    /// of a raw level dump
    #[arg(long)]
    container: bool,

    /// Suppress the per-level summary table
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(error) = run(&args) {
        error.exit();
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let _guard = mipforge::logging::init().map_err(CliError::LoggingInit)?;

    let format = args.format.pixel_format();
    let container_format = if args.container {
        Some(args.format.container_format().ok_or_else(|| {
            CliError::Config(format!(
                "format '{:?}' cannot be stored in a container; use a raw dump instead",
                args.format
            ))
        })?)
    } else {
        None
    };

    let decoded = image::open(&args.input).map_err(|error| CliError::Decode {
        path: args.input.display().to_string(),
        error,
    })?;
    let source = PixelBuffer::from_image(&decoded)?;
    info!(
        width = source.width(),
        height = source.height(),
        channels = source.channel_count(),
        "decoded input"
    );

    let mut request = CompileRequest::default()
        .with_target_size(args.width, args.height)
        .with_border_mode(args.border.into());
    if args.mipmaps {
        request = request.with_mipmaps(args.max_levels);
    }
    if args.force_pow2 {
        request = request.with_power_of_two();
    }
    if args.premultiply {
        request = request.with_premultiplied_alpha();
    }
    if args.flip_y {
        request = request.with_flip_y();
    }

    let texture = compile(&source, &request)?;
    let packed = texture.pack_levels(format)?;

    let bytes = match container_format {
        Some(image_format) => container_bytes(image_format, args.premultiply, &packed),
        None => packed.concat(),
    };
    std::fs::write(&args.output, &bytes).map_err(|error| CliError::FileWrite {
        path: args.output.display().to_string(),
        error,
    })?;

    if !args.quiet {
        print_summary(args, &packed, bytes.len());
    }
    Ok(())
}

/// Assemble a container blob: header, then each packed level in order.
fn container_bytes(
    image_format: ImageFormat,
    premultiplied: bool,
    packed: &PackedTexture,
) -> Vec<u8> {
    let (width, height) = (packed.descriptors[0].width, packed.descriptors[0].height);
    let mut flags = basic_attributes(1, width, height, 1, 1) | ATTRIBUTES_COLOR;
    if premultiplied {
        flags |= ATTRIBUTES_PREMULTIPLIED;
    }
    let header = ContainerHeader::new(
        image_format,
        flags,
        1,
        packed.levels.len() as u32,
        width as u32,
        height as u32,
        1,
    );
    let mut bytes = Vec::with_capacity(header.to_bytes().len() + packed.byte_size());
    bytes.extend_from_slice(&header.to_bytes());
    for level in &packed.levels {
        bytes.extend_from_slice(level);
    }
    bytes
}

fn print_summary(args: &Args, packed: &PackedTexture, total_bytes: usize) {
    println!("Compiled {} -> {}", args.input.display(), args.output.display());
    println!("  Format: {}", packed.format);
    println!("  Levels: {}", packed.descriptors.len());
    for (i, level) in packed.descriptors.iter().enumerate() {
        println!(
            "    level {:2}: {:5} x {:<5}  offset {:10}  size {:10}",
            i, level.width, level.height, level.byte_offset, level.byte_size
        );
    }
    println!("  Total: {} bytes", total_bytes);
}
