//! Precomputed polyphase resampling matrices.
//!
//! A polyphase kernel stores one column of normalized filter taps per
//! output sample of a 1-D resize. The tap positions depend only on the
//! output index, never on the orthogonal axis, so a 2-D resize applies
//! the same kernel to every row (or column) - two independent 1-D
//! passes instead of one 2-D convolution.

use crate::buffer::{alloc_plane, AllocError};
use crate::filter::border::BorderMode;
use crate::filter::kernel::{sample_box, Filter};

/// Filter weights for resampling one axis from `source_dim` to
/// `column_count` samples.
///
/// Invariant: each column of the weight matrix sums to 1.0 (within float
/// epsilon), so resampling preserves overall intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyphaseKernel {
    window_size: usize,
    column_count: usize,
    sample_count: usize,
    scale: f32,
    scale_inverse: f32,
    filter_width: f32,
    weights: Vec<f32>,
}

impl PolyphaseKernel {
    /// Compute the weight matrix for resizing `source_dim` to
    /// `target_dim` samples with the given filter.
    ///
    /// When upsampling, the effective scale clamps to 1 and the
    /// sub-sample count to 1: there is no high-frequency content to
    /// suppress, so box integration degenerates to point sampling.
    pub fn new(
        source_dim: usize,
        target_dim: usize,
        sample_count: usize,
        filter: &Filter,
    ) -> Result<Self, AllocError> {
        assert!(source_dim >= 1 && target_dim >= 1, "dimensions must be nonzero");
        assert!(sample_count > 0, "sample count must be nonzero");

        let mut scale = target_dim as f32 / source_dim as f32;
        let scale_inverse = 1.0 / scale;
        let mut samples = sample_count;
        if scale > 1.0 {
            scale = 1.0;
            samples = 1;
        }

        let width = filter.width() * scale_inverse;
        let window_size = (2.0 * width).ceil() as usize + 1;
        let column_count = target_dim;

        let mut weights = alloc_plane(window_size * column_count, "a polyphase weight matrix")?;
        for i in 0..column_count {
            let center = (0.5 + i as f32) * scale_inverse;
            let left = (center - width).floor();
            let column = &mut weights[i * window_size..(i + 1) * window_size];
            let mut total = 0.0;
            for (j, w) in column.iter_mut().enumerate() {
                *w = sample_box(left + j as f32 - center, scale, samples, filter);
                total += *w;
            }
            for w in column.iter_mut() {
                *w /= total;
            }
        }

        Ok(Self {
            window_size,
            column_count,
            sample_count: samples,
            scale,
            scale_inverse,
            filter_width: width,
            weights,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn scale_inverse(&self) -> f32 {
        self.scale_inverse
    }

    pub fn filter_width(&self) -> f32 {
        self.filter_width
    }

    /// Borrow the normalized taps for output sample `index`.
    pub fn column(&self, index: usize) -> &[f32] {
        &self.weights[index * self.window_size..(index + 1) * self.window_size]
    }

    /// Resample one row of a source plane into `target`.
    ///
    /// `source` is a row-major `source_width * source_height` plane;
    /// `target` receives `column_count` samples for row `source_row`.
    pub fn apply_row(
        &self,
        border: BorderMode,
        source_row: usize,
        source_width: usize,
        source_height: usize,
        source: &[f32],
        target: &mut [f32],
    ) {
        for (i, out) in target.iter_mut().take(self.column_count).enumerate() {
            let center = (0.5 + i as f32) * self.scale_inverse;
            let left = (center - self.filter_width).floor() as isize;
            let taps = self.column(i);
            let mut sum = 0.0;
            for (j, &w) in taps.iter().enumerate() {
                let index = border.sample_index(
                    source_width,
                    source_height,
                    left + j as isize,
                    source_row as isize,
                );
                sum += w * source[index];
            }
            *out = sum;
        }
    }

    /// Resample one column of a source plane into `target`.
    ///
    /// The window slides vertically; `target` receives `column_count`
    /// contiguous samples for column `source_column` (the caller
    /// scatters them into its row-major output).
    pub fn apply_column(
        &self,
        border: BorderMode,
        source_column: usize,
        source_width: usize,
        source_height: usize,
        source: &[f32],
        target: &mut [f32],
    ) {
        for (i, out) in target.iter_mut().take(self.column_count).enumerate() {
            let center = (0.5 + i as f32) * self.scale_inverse;
            let left = (center - self.filter_width).floor() as isize;
            let taps = self.column(i);
            let mut sum = 0.0;
            for (j, &w) in taps.iter().enumerate() {
                let index = border.sample_index(
                    source_width,
                    source_height,
                    source_column as isize,
                    left + j as isize,
                );
                sum += w * source[index];
            }
            *out = sum;
        }
    }
}
