//! Quantization of planar buffers into interleaved wire pixel formats.
//!
//! A [`PixelFormat`] names the bit layout a GPU will consume: one to
//! four channels of 8-bit integer, half-float or 32-bit float samples,
//! or one of the packed 16-bit-per-pixel formats (565/5551/4444). Every
//! packer either produces a complete byte buffer or fails up front; it
//! never emits a partial result.
//!
//! Multi-byte words are written little-endian.

use std::fmt;

use thiserror::Error;

use crate::buffer::PixelBuffer;

mod half;

pub use half::f32_to_f16;

/// A wire pixel format the packer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8 bits per channel, 1-4 channels.
    Uint8 { channels: u8 },
    /// IEEE half-float per channel, 1-4 channels.
    Half { channels: u8 },
    /// 32-bit float per channel, 1-4 channels.
    Float32 { channels: u8 },
    /// Packed 16-bit RGB, 5-6-5 bits.
    Rgb565,
    /// Packed 16-bit RGBA, 4 bits per channel.
    Rgba4444,
    /// Packed 16-bit RGBA, 5-5-5-1 bits.
    Rgba5551,
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PixelFormat::Uint8 { channels } => write!(f, "{}-channel 8-bit", channels),
            PixelFormat::Half { channels } => write!(f, "{}-channel half-float", channels),
            PixelFormat::Float32 { channels } => write!(f, "{}-channel 32-bit float", channels),
            PixelFormat::Rgb565 => write!(f, "RGB565"),
            PixelFormat::Rgba4444 => write!(f, "RGBA4444"),
            PixelFormat::Rgba5551 => write!(f, "RGBA5551"),
        }
    }
}

/// A buffer/format combination the packer cannot satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// The buffer holds fewer channels than the format encodes.
    #[error("{format} requires {required} channels, buffer has {actual}")]
    ChannelMismatch {
        format: PixelFormat,
        required: usize,
        actual: usize,
    },
}

impl PixelFormat {
    /// Number of source channels the format requires.
    pub fn min_channels(&self) -> usize {
        match *self {
            PixelFormat::Uint8 { channels }
            | PixelFormat::Half { channels }
            | PixelFormat::Float32 { channels } => channels as usize,
            PixelFormat::Rgb565 => 3,
            PixelFormat::Rgba4444 | PixelFormat::Rgba5551 => 4,
        }
    }

    /// Number of channels the packed stream encodes.
    pub fn channel_count(&self) -> usize {
        match *self {
            PixelFormat::Rgb565 => 3,
            PixelFormat::Rgba4444 | PixelFormat::Rgba5551 => 4,
            other => other.min_channels(),
        }
    }

    /// Bytes per packed pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        match *self {
            PixelFormat::Uint8 { channels } => channels as usize,
            PixelFormat::Half { channels } => 2 * channels as usize,
            PixelFormat::Float32 { channels } => 4 * channels as usize,
            PixelFormat::Rgb565 | PixelFormat::Rgba4444 | PixelFormat::Rgba5551 => 2,
        }
    }

    /// Quantize and interleave `buffer` into this format.
    ///
    /// Fails without producing any bytes when the buffer has fewer
    /// channels than the format needs; extra channels are ignored.
    pub fn pack(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, PackError> {
        let required = self.min_channels();
        if buffer.channel_count() < required {
            return Err(PackError::ChannelMismatch {
                format: *self,
                required,
                actual: buffer.channel_count(),
            });
        }
        let pixel_count = buffer.width() * buffer.height();
        let mut out = Vec::with_capacity(pixel_count * self.bytes_per_pixel());
        match *self {
            PixelFormat::Uint8 { channels } => {
                for i in 0..pixel_count {
                    for c in 0..channels as usize {
                        out.push(quantize_u8(buffer.channel(c)[i]));
                    }
                }
            }
            PixelFormat::Half { channels } => {
                for i in 0..pixel_count {
                    for c in 0..channels as usize {
                        out.extend_from_slice(&f32_to_f16(buffer.channel(c)[i]).to_le_bytes());
                    }
                }
            }
            PixelFormat::Float32 { channels } => {
                for i in 0..pixel_count {
                    for c in 0..channels as usize {
                        out.extend_from_slice(&buffer.channel(c)[i].to_le_bytes());
                    }
                }
            }
            PixelFormat::Rgb565 => {
                for i in 0..pixel_count {
                    let r = quantize_u8(buffer.channel(0)[i]) as u16;
                    let g = quantize_u8(buffer.channel(1)[i]) as u16;
                    let b = quantize_u8(buffer.channel(2)[i]) as u16;
                    let word = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
                    out.extend_from_slice(&word.to_le_bytes());
                }
            }
            PixelFormat::Rgba4444 => {
                for i in 0..pixel_count {
                    let r = quantize_u8(buffer.channel(0)[i]) as u16;
                    let g = quantize_u8(buffer.channel(1)[i]) as u16;
                    let b = quantize_u8(buffer.channel(2)[i]) as u16;
                    let a = quantize_u8(buffer.channel(3)[i]) as u16;
                    let word = ((r >> 4) << 12) | ((g >> 4) << 8) | ((b >> 4) << 4) | (a >> 4);
                    out.extend_from_slice(&word.to_le_bytes());
                }
            }
            PixelFormat::Rgba5551 => {
                for i in 0..pixel_count {
                    let r = quantize_u8(buffer.channel(0)[i]) as u16;
                    let g = quantize_u8(buffer.channel(1)[i]) as u16;
                    let b = quantize_u8(buffer.channel(2)[i]) as u16;
                    let a = quantize_u8(buffer.channel(3)[i]) as u16;
                    let word = ((r >> 3) << 11) | ((g >> 3) << 6) | ((b >> 3) << 1) | (a >> 7);
                    out.extend_from_slice(&word.to_le_bytes());
                }
            }
        }
        Ok(out)
    }
}

/// Quantize a nominal `[0, 1]` sample to an 8-bit value, rounding.
fn quantize_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
