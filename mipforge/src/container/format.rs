//! Container image formats and their storage properties.

use std::fmt;

/// Runtime image data formats a container can store.
///
/// Discriminants are the on-disk format codes and must never be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ImageFormat {
    /// One 8-bit channel.
    R8 = 1,
    /// Two 8-bit channels.
    Rg8 = 2,
    /// Three 8-bit channels.
    Rgb8 = 3,
    /// Four 8-bit channels.
    Rgba8 = 4,
    /// One 16-bit channel.
    R16 = 5,
    /// Two 16-bit channels.
    Rg16 = 6,
    /// Four 16-bit channels.
    Rgba16 = 7,
    /// One half-float channel.
    R16f = 8,
    /// Two half-float channels.
    Rg16f = 9,
    /// Four half-float channels.
    Rgba16f = 10,
    /// One 32-bit float channel.
    R32f = 11,
    /// Two 32-bit float channels.
    Rg32f = 12,
    /// Four 32-bit float channels.
    Rgba32f = 13,
    /// Packed 10-10-10-2, typically HDR color in an LDR footprint.
    Rgb10A2 = 14,
    /// Block-compressed RGB(A), 8 bytes per 4x4 block (DXT1).
    Bc1 = 15,
    /// Block-compressed RGBA with stepped alpha, 16 bytes per block (DXT3).
    Bc2 = 16,
    /// Block-compressed RGBA with interpolated alpha, 16 bytes per block (DXT5).
    Bc3 = 17,
    /// Single-channel block compression, 8 bytes per block.
    Bc4 = 24,
    /// Two-channel block compression, 16 bytes per block.
    Bc5 = 25,
    /// PowerVR 2-bpp compressed ARGB.
    Pvrtc1 = 28,
    /// PowerVR 4-bpp compressed ARGB.
    Pvrtc2 = 29,
}

/// Storage family of a format, the axis the layout arithmetic switches
/// on. Adding a format means adding a variant here, not a new special
/// case at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    /// Uncompressed; a level is `width * height * bytes_per_pixel`.
    Plain { bytes_per_pixel: usize },
    /// Block-compressed on 4x4 texel blocks.
    Block { bytes_per_block: usize },
    /// PowerVR 2-bpp, minimum footprint 16x8 texels.
    Pvrtc1,
    /// PowerVR 4-bpp, minimum footprint 8x8 texels.
    Pvrtc2,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::R8 => "R8",
            ImageFormat::Rg8 => "RG8",
            ImageFormat::Rgb8 => "RGB8",
            ImageFormat::Rgba8 => "RGBA8",
            ImageFormat::R16 => "R16",
            ImageFormat::Rg16 => "RG16",
            ImageFormat::Rgba16 => "RGBA16",
            ImageFormat::R16f => "R16F",
            ImageFormat::Rg16f => "RG16F",
            ImageFormat::Rgba16f => "RGBA16F",
            ImageFormat::R32f => "R32F",
            ImageFormat::Rg32f => "RG32F",
            ImageFormat::Rgba32f => "RGBA32F",
            ImageFormat::Rgb10A2 => "RGB10A2",
            ImageFormat::Bc1 => "BC1",
            ImageFormat::Bc2 => "BC2",
            ImageFormat::Bc3 => "BC3",
            ImageFormat::Bc4 => "BC4",
            ImageFormat::Bc5 => "BC5",
            ImageFormat::Pvrtc1 => "PVRTC1",
            ImageFormat::Pvrtc2 => "PVRTC2",
        };
        f.write_str(name)
    }
}

impl ImageFormat {
    /// The on-disk format code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a format by its on-disk code.
    pub fn from_code(code: i32) -> Option<Self> {
        let format = match code {
            1 => ImageFormat::R8,
            2 => ImageFormat::Rg8,
            3 => ImageFormat::Rgb8,
            4 => ImageFormat::Rgba8,
            5 => ImageFormat::R16,
            6 => ImageFormat::Rg16,
            7 => ImageFormat::Rgba16,
            8 => ImageFormat::R16f,
            9 => ImageFormat::Rg16f,
            10 => ImageFormat::Rgba16f,
            11 => ImageFormat::R32f,
            12 => ImageFormat::Rg32f,
            13 => ImageFormat::Rgba32f,
            14 => ImageFormat::Rgb10A2,
            15 => ImageFormat::Bc1,
            16 => ImageFormat::Bc2,
            17 => ImageFormat::Bc3,
            24 => ImageFormat::Bc4,
            25 => ImageFormat::Bc5,
            28 => ImageFormat::Pvrtc1,
            29 => ImageFormat::Pvrtc2,
            _ => return None,
        };
        Some(format)
    }

    /// Storage family, the single dispatch point for layout math.
    pub fn family(self) -> FormatFamily {
        match self {
            ImageFormat::R8 => FormatFamily::Plain { bytes_per_pixel: 1 },
            ImageFormat::Rg8 | ImageFormat::R16 | ImageFormat::R16f => {
                FormatFamily::Plain { bytes_per_pixel: 2 }
            }
            ImageFormat::Rgb8 => FormatFamily::Plain { bytes_per_pixel: 3 },
            ImageFormat::Rgba8
            | ImageFormat::Rg16
            | ImageFormat::Rg16f
            | ImageFormat::R32f
            | ImageFormat::Rgb10A2 => FormatFamily::Plain { bytes_per_pixel: 4 },
            ImageFormat::Rgba16 | ImageFormat::Rgba16f | ImageFormat::Rg32f => {
                FormatFamily::Plain { bytes_per_pixel: 8 }
            }
            ImageFormat::Rgba32f => FormatFamily::Plain {
                bytes_per_pixel: 16,
            },
            ImageFormat::Bc1 | ImageFormat::Bc4 => FormatFamily::Block { bytes_per_block: 8 },
            ImageFormat::Bc2 | ImageFormat::Bc3 | ImageFormat::Bc5 => FormatFamily::Block {
                bytes_per_block: 16,
            },
            ImageFormat::Pvrtc1 => FormatFamily::Pvrtc1,
            ImageFormat::Pvrtc2 => FormatFamily::Pvrtc2,
        }
    }

    /// Number of data channels the format encodes.
    pub fn channel_count(self) -> usize {
        match self {
            ImageFormat::R8 | ImageFormat::R16 | ImageFormat::R16f | ImageFormat::R32f
            | ImageFormat::Bc4 => 1,
            ImageFormat::Rg8 | ImageFormat::Rg16 | ImageFormat::Rg16f | ImageFormat::Rg32f
            | ImageFormat::Bc5 => 2,
            ImageFormat::Rgb8 => 3,
            ImageFormat::Rgba8
            | ImageFormat::Rgba16
            | ImageFormat::Rgba16f
            | ImageFormat::Rgba32f
            | ImageFormat::Rgb10A2
            | ImageFormat::Bc1
            | ImageFormat::Bc2
            | ImageFormat::Bc3
            | ImageFormat::Pvrtc1
            | ImageFormat::Pvrtc2 => 4,
        }
    }

    /// Bytes per pixel for uncompressed formats, 0 otherwise.
    pub fn bytes_per_pixel(self) -> usize {
        match self.family() {
            FormatFamily::Plain { bytes_per_pixel } => bytes_per_pixel,
            _ => 0,
        }
    }

    /// Bytes per 4x4 block for block-compressed formats, 0 otherwise.
    pub fn bytes_per_block(self) -> usize {
        match self.family() {
            FormatFamily::Block { bytes_per_block } => bytes_per_block,
            _ => 0,
        }
    }

    /// Bytes per channel value for plain, non-packed formats, 0 otherwise.
    pub fn bytes_per_channel(self) -> usize {
        match self {
            ImageFormat::R8 | ImageFormat::Rg8 | ImageFormat::Rgb8 | ImageFormat::Rgba8 => 1,
            ImageFormat::R16
            | ImageFormat::Rg16
            | ImageFormat::Rgba16
            | ImageFormat::R16f
            | ImageFormat::Rg16f
            | ImageFormat::Rgba16f => 2,
            ImageFormat::R32f | ImageFormat::Rg32f | ImageFormat::Rgba32f => 4,
            _ => 0,
        }
    }

    /// Non-packed, non-compressed format?
    pub fn is_plain(self) -> bool {
        matches!(self.family(), FormatFamily::Plain { .. }) && self != ImageFormat::Rgb10A2
    }

    /// Stores floating-point samples?
    pub fn is_float(self) -> bool {
        matches!(
            self,
            ImageFormat::R16f
                | ImageFormat::Rg16f
                | ImageFormat::Rgba16f
                | ImageFormat::R32f
                | ImageFormat::Rg32f
                | ImageFormat::Rgba32f
        )
    }

    /// Packs components narrower than 8 bits?
    pub fn is_packed(self) -> bool {
        matches!(
            self,
            ImageFormat::Rgb10A2 | ImageFormat::Pvrtc1 | ImageFormat::Pvrtc2
        )
    }

    /// Any compressed representation?
    pub fn is_compressed(self) -> bool {
        !matches!(self.family(), FormatFamily::Plain { .. })
    }

    /// 4x4 block compression (BCn/S3TC)?
    pub fn is_block_compressed(self) -> bool {
        matches!(self.family(), FormatFamily::Block { .. })
    }

    /// PowerVR compression?
    pub fn is_pvrtc(self) -> bool {
        matches!(self.family(), FormatFamily::Pvrtc1 | FormatFamily::Pvrtc2)
    }
}
