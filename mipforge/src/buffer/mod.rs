//! Planar floating-point image buffers.
//!
//! A [`PixelBuffer`] keeps each color channel in its own contiguous
//! `f32` plane rather than interleaving samples per pixel. All image
//! processing (resampling, gamma conversion, premultiplication) operates
//! on these planes without precision loss; quantization to a wire format
//! happens only at the very end, in the [`crate::pack`] module.
//!
//! Channel values are nominally in `[0, 1]`. Operations that act on a
//! subset of channels take a `Range<usize>` of channel indices, so color
//! channels can be processed while a trailing alpha channel is left
//! untouched.

use std::ops::Range;

use thiserror::Error;

mod view;

pub use view::ChannelView;

/// Maximum number of channels a buffer may hold (R, G, B, A).
pub const MAX_CHANNELS: usize = 4;

/// An allocation request that could not be satisfied.
///
/// Buffers and filter-weight matrices are the only allocations large
/// enough to fail in practice; both report through this type so the
/// failure can be propagated instead of aborting the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not allocate {bytes} bytes for {what}")]
pub struct AllocError {
    what: &'static str,
    bytes: usize,
}

impl AllocError {
    pub(crate) fn new(what: &'static str, bytes: usize) -> Self {
        Self { what, bytes }
    }
}

/// Allocate a zero-filled `f32` plane, reporting failure instead of
/// aborting.
pub(crate) fn alloc_plane(len: usize, what: &'static str) -> Result<Vec<f32>, AllocError> {
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(len)
        .map_err(|_| AllocError::new(what, len * std::mem::size_of::<f32>()))?;
    plane.resize(len, 0.0);
    Ok(plane)
}

/// A planar image: up to four same-sized `f32` channel planes.
///
/// The buffer owns its planes exclusively; they are released exactly once
/// when the buffer is dropped, on every exit path. Non-owning permuted
/// access is available through [`PixelBuffer::swizzle`].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: Vec<Vec<f32>>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer.
    ///
    /// # Panics
    ///
    /// Panics if `channel_count` is not in `1..=4` or either dimension
    /// is zero; those are caller bugs, not runtime conditions.
    pub fn allocate(
        width: usize,
        height: usize,
        channel_count: usize,
    ) -> Result<Self, AllocError> {
        assert!(width > 0 && height > 0, "buffer dimensions must be nonzero");
        assert!(
            (1..=MAX_CHANNELS).contains(&channel_count),
            "channel count must be in 1..={}",
            MAX_CHANNELS
        );
        let mut channels = Vec::with_capacity(channel_count);
        for _ in 0..channel_count {
            channels.push(alloc_plane(width * height, "an image channel plane")?);
        }
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// Build a buffer from a decoded image.
    ///
    /// The channel count follows the source color type (grey, grey+alpha,
    /// RGB, RGBA); integer samples are scaled into `[0, 1]`.
    pub fn from_image(source: &image::DynamicImage) -> Result<Self, AllocError> {
        let width = source.width() as usize;
        let height = source.height() as usize;
        let channel_count = (source.color().channel_count() as usize).min(MAX_CHANNELS);
        let mut buffer = Self::allocate(width, height, channel_count)?;
        match channel_count {
            1 => buffer.deinterleave(source.to_luma32f().as_raw()),
            2 => buffer.deinterleave(source.to_luma_alpha32f().as_raw()),
            3 => buffer.deinterleave(source.to_rgb32f().as_raw()),
            _ => buffer.deinterleave(source.to_rgba32f().as_raw()),
        }
        Ok(buffer)
    }

    fn deinterleave(&mut self, samples: &[f32]) {
        let count = self.channels.len();
        for (i, px) in samples.chunks_exact(count).enumerate() {
            for (c, &v) in px.iter().enumerate() {
                self.channels[c][i] = v;
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Borrow one channel plane, row-major.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Mutably borrow one channel plane, row-major.
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Copy the contents of `source` into this buffer.
    ///
    /// Both buffers must have identical dimensions and channel counts.
    pub fn copy_from(&mut self, source: &PixelBuffer) {
        assert_eq!(self.width, source.width);
        assert_eq!(self.height, source.height);
        assert_eq!(self.channels.len(), source.channels.len());
        for (dst, src) in self.channels.iter_mut().zip(&source.channels) {
            dst.copy_from_slice(src);
        }
    }

    /// Copy `source` into this buffer with its upper-left corner at
    /// (`target_x`, `target_y`), clipped to this buffer's bounds.
    ///
    /// Rows are copied per channel; the source is never scaled.
    pub fn copy_region(&mut self, source: &PixelBuffer, target_x: usize, target_y: usize) {
        assert_eq!(self.channels.len(), source.channels.len());
        if target_x >= self.width || target_y >= self.height {
            return;
        }
        let rows = source.height.min(self.height - target_y);
        let cols = source.width.min(self.width - target_x);
        for (dst, src) in self.channels.iter_mut().zip(&source.channels) {
            let mut src_offset = 0;
            let mut dst_offset = target_y * self.width + target_x;
            for _ in 0..rows {
                dst[dst_offset..dst_offset + cols].copy_from_slice(&src[src_offset..src_offset + cols]);
                src_offset += source.width;
                dst_offset += self.width;
            }
        }
    }

    /// Set every element of the given channels to `value`.
    pub fn fill(&mut self, channels: Range<usize>, value: f32) {
        for c in channels {
            self.channels[c].fill(value);
        }
    }

    /// Flip the image vertically in place: row `y` swaps with row
    /// `height - 1 - y` in every channel.
    pub fn flip_vertical(&mut self) {
        let width = self.width;
        let height = self.height;
        for plane in &mut self.channels {
            for y in 0..height / 2 {
                let (top, bottom) = plane.split_at_mut((height - 1 - y) * width);
                top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
            }
        }
    }

    /// Clamp the given channels into `[min, max]`.
    pub fn clamp(&mut self, channels: Range<usize>, min: f32, max: f32) {
        for c in channels {
            for v in &mut self.channels[c] {
                *v = v.clamp(min, max);
            }
        }
    }

    /// Apply `v' = v * scale + bias` over the given channels.
    pub fn scale_bias(&mut self, channels: Range<usize>, scale: f32, bias: f32) {
        for c in channels {
            for v in &mut self.channels[c] {
                *v = *v * scale + bias;
            }
        }
    }

    /// Apply `v' = v ^ power` over the given channels.
    pub fn exponentiate(&mut self, channels: Range<usize>, power: f32) {
        for c in channels {
            for v in &mut self.channels[c] {
                *v = v.powf(power);
            }
        }
    }

    /// Convert the given channels from gamma-encoded to linear light
    /// (`v' = v ^ (1/gamma_power)`).
    pub fn to_linear(&mut self, channels: Range<usize>, gamma_power: f32) {
        self.exponentiate(channels, 1.0 / gamma_power);
    }

    /// Convert the given channels from linear light back to gamma
    /// encoding (`v' = v ^ gamma_power`).
    pub fn to_gamma(&mut self, channels: Range<usize>, gamma_power: f32) {
        self.exponentiate(channels, gamma_power);
    }

    /// Multiply the given channels elementwise by the channel at
    /// `alpha_index`.
    ///
    /// `alpha_index` must not fall inside `channels`.
    pub fn premultiply_alpha(&mut self, channels: Range<usize>, alpha_index: usize) {
        assert!(
            !channels.contains(&alpha_index),
            "alpha channel cannot premultiply itself"
        );
        for c in channels {
            let (plane, alpha) = if c < alpha_index {
                let (left, right) = self.channels.split_at_mut(alpha_index);
                (&mut left[c], &right[0])
            } else {
                let (left, right) = self.channels.split_at_mut(c);
                (&mut right[0], &left[alpha_index])
            };
            for (v, a) in plane.iter_mut().zip(alpha.iter()) {
                *v *= *a;
            }
        }
    }

    /// Smallest element of one channel.
    pub fn channel_minimum(&self, channel: usize) -> f32 {
        self.channels[channel]
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min)
    }

    /// Largest element of one channel.
    pub fn channel_maximum(&self, channel: usize) -> f32 {
        self.channels[channel]
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Mean of one channel.
    pub fn channel_average(&self, channel: usize) -> f32 {
        let plane = &self.channels[channel];
        if plane.is_empty() {
            return 0.0;
        }
        plane.iter().sum::<f32>() / plane.len() as f32
    }

    /// Collapse the buffer to a single monochrome plane using one scale
    /// factor per channel, `m = r*sr + g*sg + b*sb + a*sa`.
    ///
    /// Scale factors for channels the buffer does not have are ignored.
    pub fn monochrome(&self, scales: [f32; MAX_CHANNELS]) -> Result<Vec<f32>, AllocError> {
        let mut out = alloc_plane(self.width * self.height, "a monochrome plane")?;
        for (plane, &scale) in self.channels.iter().zip(scales.iter()) {
            for (m, &v) in out.iter_mut().zip(plane.iter()) {
                *m += v * scale;
            }
        }
        Ok(out)
    }

    /// Collapse to grayscale with the standard luma weights.
    pub fn grayscale(&self) -> Result<Vec<f32>, AllocError> {
        self.monochrome([0.39, 0.50, 0.11, 0.0])
    }

    /// Fraction of alpha samples that pass an alpha test against
    /// `reference`, in `[0, 1]`.
    pub fn alpha_test_coverage(&self, alpha_index: usize, reference: f32) -> f32 {
        let plane = &self.channels[alpha_index];
        if plane.is_empty() {
            return 0.0;
        }
        let passing = plane.iter().filter(|&&a| a > reference).count();
        passing as f32 / plane.len() as f32
    }

    /// Scale the alpha channel so approximately `desired_coverage` of
    /// samples pass an alpha test against `reference`.
    ///
    /// The scale is found with a 10-step binary search on the reference
    /// value; afterwards alpha is clamped back into `[0, 1]`.
    pub fn scale_alpha_to_coverage(
        &mut self,
        alpha_index: usize,
        desired_coverage: f32,
        reference: f32,
    ) {
        let mut min_ref = 0.0f32;
        let mut max_ref = 1.0f32;
        let mut mid_ref = 0.5f32;
        for _ in 0..10 {
            let coverage = self.alpha_test_coverage(alpha_index, mid_ref);
            if coverage > desired_coverage {
                min_ref = mid_ref;
            } else if coverage < desired_coverage {
                max_ref = mid_ref;
            } else {
                break;
            }
            mid_ref = 0.5 * (min_ref + max_ref);
        }
        let scale = reference / mid_ref;
        self.scale_bias(alpha_index..alpha_index + 1, scale, 0.0);
        self.clamp(alpha_index..alpha_index + 1, 0.0, 1.0);
    }

    /// Borrow the buffer's channels under a new ordering without copying
    /// any data.
    ///
    /// `order[i]` names the source channel that appears as channel `i`
    /// of the view. The view never owns the planes, so the storage is
    /// still released exactly once, by this buffer.
    pub fn swizzle(&self, order: [usize; MAX_CHANNELS]) -> ChannelView<'_> {
        ChannelView::new(self, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_buffer(width: usize, height: usize, channels: usize) -> PixelBuffer {
        let mut buffer = PixelBuffer::allocate(width, height, channels).unwrap();
        for c in 0..channels {
            for i in 0..width * height {
                buffer.channel_mut(c)[i] = (i + c) as f32 / (width * height + channels) as f32;
            }
        }
        buffer
    }

    #[test]
    fn test_allocate_dimensions() {
        let buffer = PixelBuffer::allocate(8, 4, 3).unwrap();
        assert_eq!(buffer.width(), 8);
        assert_eq!(buffer.height(), 4);
        assert_eq!(buffer.channel_count(), 3);
        assert_eq!(buffer.channel(0).len(), 32);
    }

    #[test]
    fn test_allocate_zero_filled() {
        let buffer = PixelBuffer::allocate(4, 4, 2).unwrap();
        assert!(buffer.channel(0).iter().all(|&v| v == 0.0));
        assert!(buffer.channel(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    #[should_panic]
    fn test_allocate_rejects_five_channels() {
        let _ = PixelBuffer::allocate(4, 4, 5);
    }

    #[test]
    fn test_copy_from_matches_source() {
        let source = gradient_buffer(8, 8, 3);
        let mut target = PixelBuffer::allocate(8, 8, 3).unwrap();
        target.copy_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn test_copy_region_clips_to_bounds() {
        let mut source = PixelBuffer::allocate(4, 4, 1).unwrap();
        source.fill(0..1, 1.0);
        let mut target = PixelBuffer::allocate(6, 6, 1).unwrap();
        target.copy_region(&source, 4, 4);

        // Only the 2x2 overlap is written.
        let written: usize = target.channel(0).iter().filter(|&&v| v == 1.0).count();
        assert_eq!(written, 4);
        assert_eq!(target.channel(0)[4 * 6 + 4], 1.0);
        assert_eq!(target.channel(0)[5 * 6 + 5], 1.0);
        assert_eq!(target.channel(0)[0], 0.0);
    }

    #[test]
    fn test_copy_region_interior() {
        let mut source = PixelBuffer::allocate(2, 2, 2).unwrap();
        source.fill(0..2, 0.5);
        let mut target = PixelBuffer::allocate(8, 8, 2).unwrap();
        target.copy_region(&source, 3, 2);
        for c in 0..2 {
            assert_eq!(target.channel(c)[2 * 8 + 3], 0.5);
            assert_eq!(target.channel(c)[3 * 8 + 4], 0.5);
            assert_eq!(target.channel(c)[2 * 8 + 2], 0.0);
        }
    }

    #[test]
    fn test_fill_range_only_touches_requested_channels() {
        let mut buffer = PixelBuffer::allocate(4, 4, 4).unwrap();
        buffer.fill(1..3, 0.25);
        assert!(buffer.channel(0).iter().all(|&v| v == 0.0));
        assert!(buffer.channel(1).iter().all(|&v| v == 0.25));
        assert!(buffer.channel(2).iter().all(|&v| v == 0.25));
        assert!(buffer.channel(3).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_flip_vertical_swaps_rows() {
        let mut buffer = PixelBuffer::allocate(3, 3, 1).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                buffer.channel_mut(0)[y * 3 + x] = y as f32;
            }
        }
        buffer.flip_vertical();
        assert!(buffer.channel(0)[0..3].iter().all(|&v| v == 2.0));
        assert!(buffer.channel(0)[3..6].iter().all(|&v| v == 1.0));
        assert!(buffer.channel(0)[6..9].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_flip_vertical_twice_is_identity() {
        let original = gradient_buffer(5, 4, 2);
        let mut buffer = original.clone();
        buffer.flip_vertical();
        buffer.flip_vertical();
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_clamp() {
        let mut buffer = PixelBuffer::allocate(2, 2, 1).unwrap();
        buffer.channel_mut(0).copy_from_slice(&[-0.5, 0.25, 0.75, 1.5]);
        buffer.clamp(0..1, 0.0, 1.0);
        assert_eq!(buffer.channel(0), &[0.0, 0.25, 0.75, 1.0]);
    }

    #[test]
    fn test_scale_bias() {
        let mut buffer = PixelBuffer::allocate(2, 1, 1).unwrap();
        buffer.channel_mut(0).copy_from_slice(&[0.0, 1.0]);
        buffer.scale_bias(0..1, 2.0, 0.5);
        assert_eq!(buffer.channel(0), &[0.5, 2.5]);
    }

    #[test]
    fn test_exponentiate() {
        let mut buffer = PixelBuffer::allocate(2, 1, 1).unwrap();
        buffer.channel_mut(0).copy_from_slice(&[0.25, 1.0]);
        buffer.exponentiate(0..1, 0.5);
        assert!((buffer.channel(0)[0] - 0.5).abs() < 1e-6);
        assert!((buffer.channel(0)[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gamma_roundtrip() {
        let mut buffer = gradient_buffer(4, 4, 3);
        let original = buffer.clone();
        buffer.to_linear(0..3, 2.2);
        buffer.to_gamma(0..3, 2.2);
        for c in 0..3 {
            for (a, b) in buffer.channel(c).iter().zip(original.channel(c)) {
                assert!((a - b).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_premultiply_alpha() {
        let mut buffer = PixelBuffer::allocate(2, 1, 4).unwrap();
        buffer.channel_mut(0).copy_from_slice(&[1.0, 0.8]);
        buffer.channel_mut(1).copy_from_slice(&[0.5, 0.6]);
        buffer.channel_mut(2).copy_from_slice(&[0.25, 0.4]);
        buffer.channel_mut(3).copy_from_slice(&[0.5, 0.0]);
        buffer.premultiply_alpha(0..3, 3);
        assert_eq!(buffer.channel(0), &[0.5, 0.0]);
        assert_eq!(buffer.channel(1), &[0.25, 0.0]);
        assert_eq!(buffer.channel(2), &[0.125, 0.0]);
        // Alpha itself is untouched.
        assert_eq!(buffer.channel(3), &[0.5, 0.0]);
    }

    #[test]
    fn test_channel_statistics() {
        let mut buffer = PixelBuffer::allocate(2, 2, 1).unwrap();
        buffer.channel_mut(0).copy_from_slice(&[0.0, 0.5, 0.25, 1.0]);
        assert_eq!(buffer.channel_minimum(0), 0.0);
        assert_eq!(buffer.channel_maximum(0), 1.0);
        assert!((buffer.channel_average(0) - 0.4375).abs() < 1e-6);
    }

    #[test]
    fn test_monochrome_weights() {
        let mut buffer = PixelBuffer::allocate(1, 1, 3).unwrap();
        buffer.channel_mut(0)[0] = 1.0;
        buffer.channel_mut(1)[0] = 0.5;
        buffer.channel_mut(2)[0] = 0.25;
        let mono = buffer.monochrome([0.4, 0.4, 0.2, 0.0]).unwrap();
        assert!((mono[0] - (0.4 + 0.2 + 0.05)).abs() < 1e-6);
    }

    #[test]
    fn test_grayscale_white_is_full() {
        let mut buffer = PixelBuffer::allocate(2, 2, 3).unwrap();
        buffer.fill(0..3, 1.0);
        let gray = buffer.grayscale().unwrap();
        for v in gray {
            assert!((v - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_alpha_test_coverage() {
        let mut buffer = PixelBuffer::allocate(2, 2, 4).unwrap();
        buffer.channel_mut(3).copy_from_slice(&[0.1, 0.4, 0.6, 0.9]);
        assert_eq!(buffer.alpha_test_coverage(3, 0.5), 0.5);
        assert_eq!(buffer.alpha_test_coverage(3, 0.0), 1.0);
        assert_eq!(buffer.alpha_test_coverage(3, 1.0), 0.0);
    }

    #[test]
    fn test_scale_alpha_to_coverage_raises_coverage() {
        let mut buffer = PixelBuffer::allocate(4, 4, 4).unwrap();
        for (i, v) in buffer.channel_mut(3).iter_mut().enumerate() {
            *v = i as f32 / 32.0; // all below 0.5
        }
        let before = buffer.alpha_test_coverage(3, 0.5);
        buffer.scale_alpha_to_coverage(3, 0.75, 0.5);
        let after = buffer.alpha_test_coverage(3, 0.5);
        assert!(after > before);
        assert!(buffer.channel(3).iter().all(|&a| (0.0..=1.0).contains(&a)));
    }

    #[test]
    fn test_from_image_rgba() {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 128, 255]));
        img.put_pixel(1, 1, image::Rgba([0, 255, 0, 0]));
        let dynamic = image::DynamicImage::ImageRgba8(img);
        let buffer = PixelBuffer::from_image(&dynamic).unwrap();
        assert_eq!(buffer.channel_count(), 4);
        assert!((buffer.channel(0)[0] - 1.0).abs() < 1e-6);
        assert!((buffer.channel(2)[0] - 128.0 / 255.0).abs() < 1e-2);
        assert!((buffer.channel(1)[3] - 1.0).abs() < 1e-6);
        assert_eq!(buffer.channel(3)[3], 0.0);
    }

    #[test]
    fn test_from_image_grayscale_channel_count() {
        let img = image::GrayImage::new(3, 3);
        let dynamic = image::DynamicImage::ImageLuma8(img);
        let buffer = PixelBuffer::from_image(&dynamic).unwrap();
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.width(), 3);
    }
}
