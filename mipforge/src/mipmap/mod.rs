//! Mipmap pyramid construction.
//!
//! Resizing uses a 32-sample Kaiser filter applied separably through a
//! [`PolyphaseKernel`]: a horizontal pass produces a `target_w x src_h`
//! intermediate, a vertical pass produces the final plane, independently
//! per channel.
//!
//! Mip generation is gamma-aware. Stored images are gamma-encoded, but
//! averaging gamma values darkens the result, so the chain is built by
//! converting level 0 to linear light, resampling every level directly
//! from it, and re-applying gamma to each output. Resampling from level
//! 0 rather than the previous level keeps filtering error from
//! compounding down the chain.

use tracing::debug;

use crate::buffer::{AllocError, PixelBuffer};
use crate::filter::{BorderMode, Filter, PolyphaseKernel};

/// Default gamma exponent for stored color data.
pub const DEFAULT_GAMMA_POWER: f32 = 2.2;

/// Sub-samples integrated per filter tap during resizing.
const RESIZE_SAMPLE_COUNT: usize = 32;

/// Native half-width of the resize filter.
const RESIZE_FILTER_WIDTH: f32 = 1.0;

/// Builds resized base levels and gamma-correct mipmap chains.
#[derive(Debug, Clone)]
pub struct MipmapGenerator {
    border_mode: BorderMode,
    gamma_power: f32,
}

impl Default for MipmapGenerator {
    fn default() -> Self {
        Self::new(BorderMode::default())
    }
}

impl MipmapGenerator {
    pub fn new(border_mode: BorderMode) -> Self {
        Self {
            border_mode,
            gamma_power: DEFAULT_GAMMA_POWER,
        }
    }

    /// Override the gamma exponent used for linear-light conversion.
    pub fn with_gamma_power(mut self, gamma_power: f32) -> Self {
        self.gamma_power = gamma_power;
        self
    }

    pub fn border_mode(&self) -> BorderMode {
        self.border_mode
    }

    pub fn gamma_power(&self) -> f32 {
        self.gamma_power
    }

    /// Resize `source` to `target_w x target_h` with the Kaiser filter,
    /// one separable two-pass resample per channel.
    pub fn resize(
        &self,
        source: &PixelBuffer,
        target_w: usize,
        target_h: usize,
    ) -> Result<PixelBuffer, AllocError> {
        let src_w = source.width();
        let src_h = source.height();
        let filter = Filter::kaiser(RESIZE_FILTER_WIDTH);
        let horizontal = PolyphaseKernel::new(src_w, target_w, RESIZE_SAMPLE_COUNT, &filter)?;
        let vertical = PolyphaseKernel::new(src_h, target_h, RESIZE_SAMPLE_COUNT, &filter)?;

        let mut target = PixelBuffer::allocate(target_w, target_h, source.channel_count())?;
        let mut intermediate = PixelBuffer::allocate(target_w, src_h, source.channel_count())?;
        let mut column = vec![0.0f32; target_h];

        for c in 0..source.channel_count() {
            // Horizontal pass: source -> intermediate, row by row.
            for y in 0..src_h {
                let row = &mut intermediate.channel_mut(c)[y * target_w..(y + 1) * target_w];
                horizontal.apply_row(self.border_mode, y, src_w, src_h, source.channel(c), row);
            }
            // Vertical pass: intermediate -> target, column by column.
            for x in 0..target_w {
                vertical.apply_column(
                    self.border_mode,
                    x,
                    target_w,
                    src_h,
                    intermediate.channel(c),
                    &mut column,
                );
                let plane = target.channel_mut(c);
                for (y, &v) in column.iter().enumerate() {
                    plane[y * target_w + x] = v;
                }
            }
        }
        Ok(target)
    }

    /// Build the level-0 image: resize when the target dimensions differ
    /// from the source, otherwise copy.
    pub fn build_level0(
        &self,
        source: &PixelBuffer,
        target_w: usize,
        target_h: usize,
    ) -> Result<PixelBuffer, AllocError> {
        if source.width() != target_w || source.height() != target_h {
            debug!(
                source_w = source.width(),
                source_h = source.height(),
                target_w,
                target_h,
                "resizing base level"
            );
            self.resize(source, target_w, target_h)
        } else {
            let mut target =
                PixelBuffer::allocate(target_w, target_h, source.channel_count())?;
            target.copy_from(source);
            Ok(target)
        }
    }

    /// Build a `level_count`-entry mipmap chain from `level0`.
    ///
    /// Level 0 is stored as-is. Additional levels are resampled from
    /// level 0 in linear light and re-gamma'd, so every stored level
    /// shares the same gamma encoding. A trailing alpha channel of a
    /// 4-channel image stays linear throughout.
    pub fn build_mipmaps(
        &self,
        level0: PixelBuffer,
        level_count: usize,
    ) -> Result<Vec<PixelBuffer>, AllocError> {
        assert!(level_count >= 1, "a chain holds at least the base level");

        let color_channels = match level0.channel_count() {
            4 => 3,
            n => n,
        };
        let width0 = level0.width();
        let height0 = level0.height();

        let mut levels = Vec::with_capacity(level_count);
        levels.push(level0);
        if level_count == 1 {
            return Ok(levels);
        }

        debug!(width0, height0, level_count, "building mipmap chain");
        levels[0].to_linear(0..color_channels, self.gamma_power);
        for i in 1..level_count {
            let level_w = miplevel_dimension(width0, i);
            let level_h = miplevel_dimension(height0, i);
            let mut level = self.resize(&levels[0], level_w, level_h)?;
            level.to_gamma(0..color_channels, self.gamma_power);
            levels.push(level);
        }
        levels[0].to_gamma(0..color_channels, self.gamma_power);

        Ok(levels)
    }
}

/// Dimension of mip level `index`, never below one texel.
pub fn miplevel_dimension(dim0: usize, index: usize) -> usize {
    (dim0 >> index).max(1)
}
