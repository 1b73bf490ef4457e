//! Uniform 1-D filter windows for same-size filtering.
//!
//! Unlike a [`crate::filter::PolyphaseKernel`], which stores distinct
//! taps per output sample for a resize, a `FilterKernel1d` holds a
//! single normalized window reused at every sample location. It covers
//! blur/sharpen-style passes where the image keeps its dimensions.

use crate::buffer::{alloc_plane, AllocError};
use crate::filter::border::BorderMode;
use crate::filter::kernel::{sample_box, Filter};

/// A precomputed, normalized 1-D filter window.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterKernel1d {
    window_size: usize,
    sample_count: usize,
    scale: f32,
    filter_width: f32,
    weights: Vec<f32>,
}

impl FilterKernel1d {
    /// Compute the window for an input extent of `scale_value` samples.
    pub fn new(
        scale_value: usize,
        sample_count: usize,
        filter: &Filter,
    ) -> Result<Self, AllocError> {
        assert!(scale_value > 1, "input extent must exceed one sample");
        assert!(sample_count > 0, "sample count must be nonzero");

        let scale = 1.0 / scale_value as f32;
        let width = filter.width() * scale;
        let window_size = (2.0 * width).ceil() as usize;

        let mut weights = alloc_plane(window_size, "a filter weight window")?;
        let offset = window_size as f32 * 0.5;
        let mut total = 0.0;
        for (i, w) in weights.iter_mut().enumerate() {
            *w = sample_box(i as f32 - offset, scale, sample_count, filter);
            total += *w;
        }
        for w in weights.iter_mut() {
            *w /= total;
        }

        Ok(Self {
            window_size,
            sample_count,
            scale,
            filter_width: width,
            weights,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Filter horizontally at one sample location.
    pub fn apply_horizontal(
        &self,
        border: BorderMode,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        source: &[f32],
    ) -> f32 {
        let offset = (self.window_size >> 1) as isize;
        let mut sum = 0.0;
        for (i, &w) in self.weights.iter().enumerate() {
            let sample_x = x as isize + i as isize - offset;
            sum += w * source[border.sample_index(width, height, sample_x, y as isize)];
        }
        sum
    }

    /// Filter vertically at one sample location.
    pub fn apply_vertical(
        &self,
        border: BorderMode,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        source: &[f32],
    ) -> f32 {
        let offset = (self.window_size >> 1) as isize;
        let mut sum = 0.0;
        for (i, &w) in self.weights.iter().enumerate() {
            let sample_y = y as isize + i as isize - offset;
            sum += w * source[border.sample_index(width, height, x as isize, sample_y)];
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let kernel = FilterKernel1d::new(64, 32, &Filter::kaiser(8.0)).unwrap();
        let sum: f32 = kernel.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_constant_signal_unchanged() {
        let kernel = FilterKernel1d::new(8, 16, &Filter::kaiser(4.0)).unwrap();
        let source = vec![0.5f32; 64];
        let filtered = kernel.apply_horizontal(BorderMode::Mirror, 3, 3, 8, 8, &source);
        assert!((filtered - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_horizontal_and_vertical_agree_on_symmetric_input() {
        let kernel = FilterKernel1d::new(8, 16, &Filter::kaiser(4.0)).unwrap();
        // Plane symmetric under transposition.
        let mut source = vec![0.0f32; 64];
        for y in 0..8 {
            for x in 0..8 {
                source[y * 8 + x] = ((x + y) % 3) as f32;
            }
        }
        let h = kernel.apply_horizontal(BorderMode::Wrap, 4, 4, 8, 8, &source);
        let v = kernel.apply_vertical(BorderMode::Wrap, 4, 4, 8, 8, &source);
        assert!((h - v).abs() < 1e-6);
    }
}
