//! The texture compiler: sanitize, build the pyramid, package.
//!
//! [`compile`] runs the whole pipeline over a source buffer: input
//! sanitization, base-level resize, optional vertical flip, mipmap
//! chain construction, optional alpha premultiplication. The result
//! holds one planar buffer per level; [`CompiledTexture::pack_levels`]
//! quantizes them into a wire format and reports per-level byte ranges.
//!
//! Every buffer allocated along the way is owned by exactly one value
//! and released once on every path out of the call, error paths
//! included.

use thiserror::Error;
use tracing::debug;

use crate::buffer::{AllocError, PixelBuffer};
use crate::container::layout;
use crate::filter::BorderMode;
use crate::mipmap::MipmapGenerator;
use crate::pack::{PackError, PixelFormat};

/// A compile invocation that could not complete. All failures are
/// terminal for the invocation and leave no cross-call state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A buffer or filter-weight allocation failed.
    #[error(transparent)]
    Allocation(#[from] AllocError),
    /// The requested wire format does not fit the image.
    #[error(transparent)]
    Pack(#[from] PackError),
}

/// Parameters for one compile invocation.
///
/// Zero values mean "derive from the source": a zero target dimension
/// uses the source dimension, a zero `maximum_levels` derives the full
/// chain. [`CompileRequest::sanitize`] resolves them; [`compile`] does
/// so automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Border sampling during resizing.
    pub border_mode: BorderMode,
    /// Desired width in pixels; 0 uses the source width.
    pub target_width: usize,
    /// Desired height in pixels; 0 uses the source height.
    pub target_height: usize,
    /// Cap on the number of mip levels; 0 derives the maximum.
    pub maximum_levels: usize,
    /// Build a mipmap chain? Implies `force_power_of_two`.
    pub build_mipmaps: bool,
    /// Round target dimensions up to powers of two.
    pub force_power_of_two: bool,
    /// Premultiply color channels by alpha (4-channel images only).
    pub premultiply_alpha: bool,
    /// Flip vertically for bottom-left origin conventions.
    pub flip_y: bool,
}

impl Default for CompileRequest {
    fn default() -> Self {
        Self {
            border_mode: BorderMode::default(),
            target_width: 0,
            target_height: 0,
            maximum_levels: 0,
            build_mipmaps: false,
            force_power_of_two: false,
            premultiply_alpha: false,
            flip_y: false,
        }
    }
}

impl CompileRequest {
    /// Request a resize to the given dimensions (0 keeps a source
    /// dimension).
    pub fn with_target_size(mut self, width: usize, height: usize) -> Self {
        self.target_width = width;
        self.target_height = height;
        self
    }

    /// Request a mipmap chain of up to `maximum_levels` levels
    /// (0 derives the full chain).
    pub fn with_mipmaps(mut self, maximum_levels: usize) -> Self {
        self.build_mipmaps = true;
        self.maximum_levels = maximum_levels;
        self
    }

    /// Override the border sampling mode.
    pub fn with_border_mode(mut self, border_mode: BorderMode) -> Self {
        self.border_mode = border_mode;
        self
    }

    /// Force power-of-two output dimensions even without mipmaps.
    pub fn with_power_of_two(mut self) -> Self {
        self.force_power_of_two = true;
        self
    }

    /// Premultiply color by alpha in the output.
    pub fn with_premultiplied_alpha(mut self) -> Self {
        self.premultiply_alpha = true;
        self
    }

    /// Flip the output vertically.
    pub fn with_flip_y(mut self) -> Self {
        self.flip_y = true;
        self
    }

    /// Resolve derived fields against the source dimensions.
    ///
    /// Fills unset target dimensions, applies the power-of-two rule
    /// (mipmapping forces it), and clamps `maximum_levels` to the count
    /// derivable from the adjusted dimensions. After this call every
    /// field holds its final value.
    pub fn sanitize(&mut self, source_width: usize, source_height: usize) {
        if self.target_width == 0 {
            self.target_width = source_width;
        }
        if self.target_height == 0 {
            self.target_height = source_height;
        }
        if self.build_mipmaps {
            self.force_power_of_two = true;
        }
        if self.force_power_of_two {
            if !self.target_width.is_power_of_two() {
                self.target_width = next_power_of_two_at_least(source_width);
            }
            if !self.target_height.is_power_of_two() {
                self.target_height = next_power_of_two_at_least(source_height);
            }
        }
        if self.build_mipmaps {
            let max_levels = layout::miplevel_count(self.target_width, self.target_height, 1);
            if self.maximum_levels == 0 || self.maximum_levels > max_levels {
                self.maximum_levels = max_levels;
            }
        } else {
            self.maximum_levels = 1;
        }
    }
}

fn next_power_of_two_at_least(dim: usize) -> usize {
    let mut pot = 1;
    while pot < dim {
        pot <<= 1;
    }
    pot
}

/// Byte range of one packed mip level, reported alongside headerless
/// dumps so callers can locate level boundaries out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevelDescriptor {
    pub width: usize,
    pub height: usize,
    pub byte_offset: usize,
    pub byte_size: usize,
}

/// The result of a successful compile: one planar buffer per level.
#[derive(Debug, Clone)]
pub struct CompiledTexture {
    channel_count: usize,
    levels: Vec<PixelBuffer>,
}

impl CompiledTexture {
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[PixelBuffer] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> &PixelBuffer {
        &self.levels[index]
    }

    /// Width and height of level 0.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.levels[0].width(), self.levels[0].height())
    }

    /// Quantize every level into `format`.
    ///
    /// The channel check runs before any level is packed, so a
    /// mismatched format fails without doing quantization work.
    pub fn pack_levels(&self, format: PixelFormat) -> Result<PackedTexture, PackError> {
        if self.channel_count < format.min_channels() {
            return Err(PackError::ChannelMismatch {
                format,
                required: format.min_channels(),
                actual: self.channel_count,
            });
        }
        let mut levels = Vec::with_capacity(self.levels.len());
        let mut descriptors = Vec::with_capacity(self.levels.len());
        let mut offset = 0;
        for level in &self.levels {
            let bytes = format.pack(level)?;
            descriptors.push(MipLevelDescriptor {
                width: level.width(),
                height: level.height(),
                byte_offset: offset,
                byte_size: bytes.len(),
            });
            offset += bytes.len();
            levels.push(bytes);
        }
        Ok(PackedTexture {
            format,
            levels,
            descriptors,
        })
    }
}

/// Packed level payloads plus their byte ranges.
#[derive(Debug, Clone)]
pub struct PackedTexture {
    pub format: PixelFormat,
    pub levels: Vec<Vec<u8>>,
    pub descriptors: Vec<MipLevelDescriptor>,
}

impl PackedTexture {
    /// Concatenate every level into one headerless stream; the
    /// descriptors give the level boundaries.
    pub fn concat(&self) -> Vec<u8> {
        let total: usize = self.levels.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(total);
        for level in &self.levels {
            out.extend_from_slice(level);
        }
        out
    }

    /// Total packed size in bytes.
    pub fn byte_size(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

/// Run the compile pipeline over `source`.
///
/// Stages: sanitize inputs, build the base level (resize or copy),
/// optional vertical flip, mipmap chain, optional premultiply. The
/// request is taken by reference and sanitized on a copy, so a caller
/// can reuse it across invocations.
pub fn compile(
    source: &PixelBuffer,
    request: &CompileRequest,
) -> Result<CompiledTexture, CompileError> {
    let mut request = request.clone();
    request.sanitize(source.width(), source.height());
    debug!(
        target_width = request.target_width,
        target_height = request.target_height,
        levels = request.maximum_levels,
        channels = source.channel_count(),
        "compiling texture"
    );

    let generator = MipmapGenerator::new(request.border_mode);
    let mut level0 =
        generator.build_level0(source, request.target_width, request.target_height)?;
    if request.flip_y {
        level0.flip_vertical();
    }

    let channel_count = level0.channel_count();
    let mut levels = generator.build_mipmaps(level0, request.maximum_levels)?;

    if request.premultiply_alpha && channel_count == 4 {
        for level in &mut levels {
            level.premultiply_alpha(0..3, 3);
        }
    }

    Ok(CompiledTexture {
        channel_count,
        levels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_fills_target_from_source() {
        let mut request = CompileRequest::default();
        request.sanitize(320, 240);
        assert_eq!(request.target_width, 320);
        assert_eq!(request.target_height, 240);
        assert_eq!(request.maximum_levels, 1);
    }

    #[test]
    fn test_sanitize_keeps_explicit_target() {
        let mut request = CompileRequest::default().with_target_size(100, 80);
        request.sanitize(320, 240);
        assert_eq!(request.target_width, 100);
        assert_eq!(request.target_height, 80);
    }

    #[test]
    fn test_sanitize_mipmaps_forces_power_of_two() {
        let mut request = CompileRequest::default().with_mipmaps(0);
        request.sanitize(100, 50);
        assert!(request.force_power_of_two);
        assert_eq!(request.target_width, 128);
        assert_eq!(request.target_height, 64);
        // floor(log2(128)) + 1
        assert_eq!(request.maximum_levels, 8);
    }

    #[test]
    fn test_sanitize_pow2_without_mipmaps() {
        let mut request = CompileRequest::default().with_power_of_two();
        request.sanitize(300, 200);
        assert_eq!(request.target_width, 512);
        assert_eq!(request.target_height, 256);
        assert_eq!(request.maximum_levels, 1);
    }

    #[test]
    fn test_sanitize_pow2_leaves_pow2_alone() {
        let mut request = CompileRequest::default().with_mipmaps(0);
        request.sanitize(256, 64);
        assert_eq!(request.target_width, 256);
        assert_eq!(request.target_height, 64);
        assert_eq!(request.maximum_levels, 9);
    }

    #[test]
    fn test_sanitize_clamps_requested_levels() {
        let mut request = CompileRequest::default().with_mipmaps(20);
        request.sanitize(64, 64);
        assert_eq!(request.maximum_levels, 7);

        let mut request = CompileRequest::default().with_mipmaps(3);
        request.sanitize(64, 64);
        assert_eq!(request.maximum_levels, 3);
    }

    #[test]
    fn test_next_power_of_two_at_least() {
        assert_eq!(next_power_of_two_at_least(1), 1);
        assert_eq!(next_power_of_two_at_least(2), 2);
        assert_eq!(next_power_of_two_at_least(3), 4);
        assert_eq!(next_power_of_two_at_least(100), 128);
        assert_eq!(next_power_of_two_at_least(512), 512);
        assert_eq!(next_power_of_two_at_least(513), 1024);
    }

    #[test]
    fn test_compile_single_level_passthrough_dimensions() {
        let source = PixelBuffer::allocate(32, 16, 3).unwrap();
        let texture = compile(&source, &CompileRequest::default()).unwrap();
        assert_eq!(texture.level_count(), 1);
        assert_eq!(texture.dimensions(), (32, 16));
        assert_eq!(texture.channel_count(), 3);
    }

    #[test]
    fn test_compile_flip_y() {
        let mut source = PixelBuffer::allocate(2, 2, 1).unwrap();
        source.channel_mut(0).copy_from_slice(&[0.0, 0.1, 0.8, 0.9]);
        let request = CompileRequest::default().with_flip_y();
        let texture = compile(&source, &request).unwrap();
        let plane = texture.level(0).channel(0);
        assert!((plane[0] - 0.8).abs() < 1e-6);
        assert!((plane[2] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_compile_premultiply_requires_four_channels() {
        // A 3-channel image ignores the premultiply flag.
        let mut source = PixelBuffer::allocate(2, 2, 3).unwrap();
        source.fill(0..3, 0.5);
        let request = CompileRequest::default().with_premultiplied_alpha();
        let texture = compile(&source, &request).unwrap();
        for &v in texture.level(0).channel(0) {
            assert!((v - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_pack_levels_descriptors() {
        let source = PixelBuffer::allocate(8, 8, 4).unwrap();
        let request = CompileRequest::default().with_mipmaps(0);
        let texture = compile(&source, &request).unwrap();
        let packed = texture
            .pack_levels(PixelFormat::Uint8 { channels: 4 })
            .unwrap();
        assert_eq!(packed.descriptors.len(), 4);
        assert_eq!(packed.descriptors[0].byte_offset, 0);
        assert_eq!(packed.descriptors[0].byte_size, 8 * 8 * 4);
        assert_eq!(packed.descriptors[1].byte_offset, 8 * 8 * 4);
        assert_eq!(packed.descriptors[1].byte_size, 4 * 4 * 4);
        assert_eq!(packed.descriptors[3].byte_size, 4);
        assert_eq!(packed.concat().len(), packed.byte_size());
        assert_eq!(packed.byte_size(), 256 + 64 + 16 + 4);
    }

    #[test]
    fn test_pack_levels_channel_mismatch_fails_early() {
        let source = PixelBuffer::allocate(4, 4, 2).unwrap();
        let texture = compile(&source, &CompileRequest::default()).unwrap();
        let result = texture.pack_levels(PixelFormat::Rgb565);
        assert!(matches!(
            result,
            Err(PackError::ChannelMismatch {
                required: 3,
                actual: 2,
                ..
            })
        ));
    }
}
